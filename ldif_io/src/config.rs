//! Loader configuration.

use crate::schema::Field;

/// How much a load call logs.
///
/// Passed with every call instead of being process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Log nothing.
    Quiet,
    /// One `info` line per loaded example.
    #[default]
    Normal,
    /// Additionally, one `debug` line per artifact with its load time.
    Verbose,
}

impl Verbosity {
    /// Whether per-example summaries are logged.
    #[inline]
    pub fn logs_summary(self) -> bool {
        self != Verbosity::Quiet
    }

    /// Whether per-artifact details are logged.
    #[inline]
    pub fn logs_details(self) -> bool {
        self == Verbosity::Verbose
    }
}

/// Where the loader finds an example's mesh id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MeshIdSource {
    /// Use the last two path components: `<tag>/<hash>` → `"tag|hash"`.
    #[default]
    DirectoryName,
    /// Read `"tag|hash"` from this file inside the example directory.
    File(String),
}

/// File names of the six numeric artifacts inside an example directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Bounding-volume samples.
    pub bounding_box_samples: String,
    /// Depth renders.
    pub depth_renders: String,
    /// Near-surface samples.
    pub near_surface_samples: String,
    /// Voxel grid.
    pub grid: String,
    /// World-to-grid transform.
    pub world2grid: String,
    /// Oriented surface samples.
    pub surface_point_samples: String,
}

impl ArtifactNames {
    /// Extension used by the default names.
    pub const DEFAULT_EXTENSION: &'static str = "ldta";

    /// File name for `field`; `None` for the mesh id, which has no artifact.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::BoundingBoxSamples => Some(&self.bounding_box_samples),
            Field::DepthRenders => Some(&self.depth_renders),
            Field::MeshId => None,
            Field::NearSurfaceSamples => Some(&self.near_surface_samples),
            Field::Grid => Some(&self.grid),
            Field::World2Grid => Some(&self.world2grid),
            Field::SurfacePointSamples => Some(&self.surface_point_samples),
        }
    }
}

impl Default for ArtifactNames {
    fn default() -> Self {
        let name = |field: Field| format!("{}.{}", field.name(), Self::DEFAULT_EXTENSION);
        Self {
            bounding_box_samples: name(Field::BoundingBoxSamples),
            depth_renders: name(Field::DepthRenders),
            near_surface_samples: name(Field::NearSurfaceSamples),
            grid: name(Field::Grid),
            world2grid: name(Field::World2Grid),
            surface_point_samples: name(Field::SurfacePointSamples),
        }
    }
}

/// Loader configuration (immutable once handed to a load call).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoaderConfig {
    /// Artifact file names.
    pub artifact_names: ArtifactNames,
    /// Mesh id resolution.
    pub mesh_id_source: MeshIdSource,
    /// Logging verbosity for calls using this config.
    pub verbosity: Verbosity,
}

impl LoaderConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artifact file names.
    pub fn with_artifact_names(mut self, names: ArtifactNames) -> Self {
        self.artifact_names = names;
        self
    }

    /// Set the mesh id source.
    pub fn with_mesh_id_source(mut self, source: MeshIdSource) -> Self {
        self.mesh_id_source = source;
        self
    }

    /// Set the verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}
