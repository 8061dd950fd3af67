//! The in-memory shape example and its mesh identifier.

use std::fmt;
use std::str::FromStr;

use ldif_core::{FloatArray, Mat4};

use crate::error::{ExampleError, MeshIdError};
use crate::schema::{Field, DEPTH_RESOLUTION, DEPTH_VIEW_COUNT};

/// `"{category_or_split_tag}|{shape_hash}"` identifier of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeshId {
    category: String,
    hash: String,
}

impl MeshId {
    /// Separator between the category and the hash.
    pub const SEPARATOR: char = '|';

    /// Build from its two parts.
    ///
    /// # Errors
    /// Fails if either part is empty or contains the separator.
    pub fn new(category: impl Into<String>, hash: impl Into<String>) -> Result<Self, MeshIdError> {
        let category = category.into();
        let hash = hash.into();
        Self::parse(&format!("{}{}{}", category, Self::SEPARATOR, hash))
    }

    /// Parse `"{tag}|{hash}"`.
    ///
    /// # Errors
    /// Fails unless the text has exactly one separator with non-empty text
    /// on both sides.
    pub fn parse(value: &str) -> Result<Self, MeshIdError> {
        let mut parts = value.split(Self::SEPARATOR);
        let (category, hash) = match (parts.next(), parts.next(), parts.next()) {
            (Some(category), Some(hash), None) => (category, hash),
            (_, None, _) => {
                return Err(MeshIdError::MissingSeparator {
                    value: value.to_owned(),
                })
            }
            _ => {
                return Err(MeshIdError::TooManySeparators {
                    value: value.to_owned(),
                })
            }
        };
        if category.is_empty() {
            return Err(MeshIdError::EmptyCategory {
                value: value.to_owned(),
            });
        }
        if hash.is_empty() {
            return Err(MeshIdError::EmptyHash {
                value: value.to_owned(),
            });
        }
        Ok(Self {
            category: category.to_owned(),
            hash: hash.to_owned(),
        })
    }

    /// Category or split tag.
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Shape hash.
    #[inline]
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.category, Self::SEPARATOR, self.hash)
    }
}

impl FromStr for MeshId {
    type Err = MeshIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One training unit: point samples, depth renders, voxel grid and
/// world-to-grid transform of a single shape.
///
/// Every numeric field has exactly its declared shape; instances are only
/// produced by [`ShapeExampleBuilder::build`] and are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeExample {
    mesh_id: MeshId,
    bounding_box_samples: FloatArray,
    depth_renders: FloatArray,
    near_surface_samples: FloatArray,
    grid: FloatArray,
    world2grid: FloatArray,
    surface_point_samples: FloatArray,
}

/// The owned contents of a [`ShapeExample`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeExampleParts {
    /// Shape identifier.
    pub mesh_id: MeshId,
    /// 100000×4 bounding-volume samples.
    pub bounding_box_samples: FloatArray,
    /// 20×224×224×1 depth renders.
    pub depth_renders: FloatArray,
    /// 100000×4 near-surface samples.
    pub near_surface_samples: FloatArray,
    /// 32×32×32 voxel grid.
    pub grid: FloatArray,
    /// 4×4 world-to-grid transform.
    pub world2grid: FloatArray,
    /// 10000×6 oriented surface samples.
    pub surface_point_samples: FloatArray,
}

impl ShapeExample {
    /// Start building an example for `mesh_id`.
    pub fn builder(mesh_id: MeshId) -> ShapeExampleBuilder {
        ShapeExampleBuilder::new(mesh_id)
    }

    /// Shape identifier.
    #[inline]
    pub fn mesh_id(&self) -> &MeshId {
        &self.mesh_id
    }

    /// 100000×4 (x, y, z, value) samples over the bounding volume.
    #[inline]
    pub fn bounding_box_samples(&self) -> &FloatArray {
        &self.bounding_box_samples
    }

    /// 20×224×224×1 depth renders, one per fixed viewpoint.
    #[inline]
    pub fn depth_renders(&self) -> &FloatArray {
        &self.depth_renders
    }

    /// 100000×4 (x, y, z, value) samples near the surface.
    #[inline]
    pub fn near_surface_samples(&self) -> &FloatArray {
        &self.near_surface_samples
    }

    /// 32×32×32 voxel grid.
    #[inline]
    pub fn grid(&self) -> &FloatArray {
        &self.grid
    }

    /// 4×4 world-to-grid transform, row-major.
    #[inline]
    pub fn world2grid(&self) -> &FloatArray {
        &self.world2grid
    }

    /// 10000×6 (x, y, z, nx, ny, nz) surface samples.
    #[inline]
    pub fn surface_point_samples(&self) -> &FloatArray {
        &self.surface_point_samples
    }

    /// Array for a numeric field; `None` for the mesh id.
    pub fn array(&self, field: Field) -> Option<&FloatArray> {
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

    /// The 224×224 depth image of viewpoint `view`, row-major.
    pub fn depth_view(&self, view: usize) -> Option<&[f32]> {
        if view >= DEPTH_VIEW_COUNT {
            return None;
        }
        debug_assert_eq!(self.depth_renders.shape()[1], DEPTH_RESOLUTION);
        self.depth_renders.outer(view)
    }

    /// The world-to-grid transform as a matrix.
    pub fn world2grid_matrix(&self) -> Mat4 {
        let mut values = [0.0f32; 16];
        values.copy_from_slice(self.world2grid.as_slice());
        Mat4::from_flat(&values)
    }

    /// Consume the example and return its fields.
    pub fn into_parts(self) -> ShapeExampleParts {
        ShapeExampleParts {
            mesh_id: self.mesh_id,
            bounding_box_samples: self.bounding_box_samples,
            depth_renders: self.depth_renders,
            near_surface_samples: self.near_surface_samples,
            grid: self.grid,
            world2grid: self.world2grid,
            surface_point_samples: self.surface_point_samples,
        }
    }
}

impl TryFrom<ShapeExampleParts> for ShapeExample {
    type Error = ExampleError;

    fn try_from(parts: ShapeExampleParts) -> Result<Self, Self::Error> {
        ShapeExample::builder(parts.mesh_id)
            .with_array(Field::BoundingBoxSamples, parts.bounding_box_samples)
            .with_array(Field::DepthRenders, parts.depth_renders)
            .with_array(Field::NearSurfaceSamples, parts.near_surface_samples)
            .with_array(Field::Grid, parts.grid)
            .with_array(Field::World2Grid, parts.world2grid)
            .with_array(Field::SurfacePointSamples, parts.surface_point_samples)
            .build()
    }
}

/// Builder for [`ShapeExample`].
///
/// Arrays may be supplied in any order; [`build`](Self::build) checks that
/// all six are present with their declared shapes.
#[derive(Debug, Clone)]
pub struct ShapeExampleBuilder {
    mesh_id: MeshId,
    arrays: [Option<FloatArray>; 6],
    misplaced: Option<Field>,
}

impl ShapeExampleBuilder {
    /// Start a builder for `mesh_id`.
    pub fn new(mesh_id: MeshId) -> Self {
        Self {
            mesh_id,
            arrays: Default::default(),
            misplaced: None,
        }
    }

    /// Set the array for a numeric field, replacing any earlier value.
    pub fn with_array(mut self, field: Field, array: FloatArray) -> Self {
        match numeric_slot(field) {
            Some(slot) => self.arrays[slot] = Some(array),
            None => self.misplaced = Some(field),
        }
        self
    }

    /// Validate and assemble the example.
    ///
    /// # Errors
    /// - `NotNumeric` if an array was given for the mesh id.
    /// - `MissingField` for the first numeric field never set.
    /// - `ShapeMismatch` for the first field whose shape differs from its
    ///   declaration.
    pub fn build(self) -> Result<ShapeExample, ExampleError> {
        if let Some(field) = self.misplaced {
            return Err(ExampleError::NotNumeric { field });
        }
        // Slots follow `Field::NUMERIC` order.
        let [bbox, depth, nss, grid, w2g, surface] = self.arrays;
        Ok(ShapeExample {
            bounding_box_samples: checked(Field::BoundingBoxSamples, bbox)?,
            depth_renders: checked(Field::DepthRenders, depth)?,
            near_surface_samples: checked(Field::NearSurfaceSamples, nss)?,
            grid: checked(Field::Grid, grid)?,
            world2grid: checked(Field::World2Grid, w2g)?,
            surface_point_samples: checked(Field::SurfacePointSamples, surface)?,
            mesh_id: self.mesh_id,
        })
    }
}

/// The array for `field`, present and at its declared shape.
fn checked(field: Field, array: Option<FloatArray>) -> Result<FloatArray, ExampleError> {
    let array = array.ok_or(ExampleError::MissingField { field })?;
    if !array.has_shape(field.shape()) {
        return Err(ExampleError::ShapeMismatch {
            field,
            expected: field.shape().to_vec(),
            got: array.shape().to_vec(),
        });
    }
    Ok(array)
}

fn numeric_slot(field: Field) -> Option<usize> {
    Field::NUMERIC.iter().position(|&f| f == field)
}
