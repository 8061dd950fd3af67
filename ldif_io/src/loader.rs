//! Loading shape examples from per-shape artifact directories.
//!
//! An example directory holds one artifact per numeric field (see
//! [`ArtifactNames`](crate::ArtifactNames)). Depth renders are stored with a
//! leading capture axis that must be exactly 1; it is dropped on load.
//! Loading either yields a complete, shape-correct [`ShapeExample`] or fails.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ldif_core::FloatArray;

use crate::config::{LoaderConfig, MeshIdSource};
use crate::error::{ArtifactError, LoadError, Result};
use crate::example::{MeshId, ShapeExample};
use crate::format::{read_artifact_shape_from, read_artifact_values_from, write_artifact};
use crate::schema::Field;

/// File name of the original mesh inside an example directory.
pub const MESH_FILE_NAME: &str = "mesh_orig.ply";

/// Example directory for the path of its `mesh_orig.ply`.
///
/// # Errors
/// `NotAMeshPath` unless the path's file name is exactly `mesh_orig.ply`
/// and it has a parent directory.
pub fn example_directory_from_mesh_path<P: AsRef<Path>>(mesh_path: P) -> Result<PathBuf> {
    let mesh_path = mesh_path.as_ref();
    let not_a_mesh = || LoadError::NotAMeshPath {
        path: mesh_path.to_path_buf(),
    };
    if mesh_path.file_name().and_then(|n| n.to_str()) != Some(MESH_FILE_NAME) {
        return Err(not_a_mesh());
    }
    match mesh_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Err(not_a_mesh()),
    }
}

/// Load one example directory.
///
/// # Errors
/// - `DirectoryNotFound` if `directory` is not a directory.
/// - `MalformedMeshId` / `UnnamedDirectory` if the mesh id cannot be resolved.
/// - `MissingArtifact` for the first absent artifact file.
/// - `InvalidArtifact` if an artifact cannot be read or parsed.
/// - `SingleViewExpected` if the depth renders' leading axis is not 1.
/// - `ShapeMismatch` if any array differs from its declared shape.
pub fn load_example<P: AsRef<Path>>(directory: P, config: &LoaderConfig) -> Result<ShapeExample> {
    let directory = directory.as_ref();
    let verbosity = config.verbosity;
    let entry = Instant::now();

    if !directory.is_dir() {
        return Err(LoadError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let mesh_id = resolve_mesh_id(directory, &config.mesh_id_source)?;
    let mut builder = ShapeExample::builder(mesh_id.clone());

    for field in Field::NUMERIC {
        let start = Instant::now();
        let array = load_field(directory, field, config)?;
        builder = builder.with_array(field, array);
        if verbosity.logs_details() {
            log::debug!("{}: {} loaded in {:?}", mesh_id, field, start.elapsed());
        }
    }

    let example = builder.build()?;
    if verbosity.logs_summary() {
        log::info!(
            "Loaded {} from {:?} in {:?}",
            mesh_id,
            directory,
            entry.elapsed()
        );
    }
    Ok(example)
}

/// Write an example as an artifact directory that [`load_example`] reads back.
///
/// Creates the directory if needed. Depth renders are written with their
/// leading capture axis restored; the mesh id file is written only when the
/// config reads the id from a file.
pub fn write_example<P: AsRef<Path>>(
    directory: P,
    example: &ShapeExample,
    config: &LoaderConfig,
) -> Result<()> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory).map_err(|source| LoadError::Io {
        path: directory.to_path_buf(),
        source,
    })?;

    for field in Field::NUMERIC {
        let path = artifact_path(directory, field, config);
        let array = match example.array(field) {
            Some(array) => array,
            None => unreachable!("numeric field `{}` has no array", field),
        };
        let result = if field == Field::DepthRenders {
            write_artifact(&path, &array.clone().unsqueeze_leading())
        } else {
            write_artifact(&path, array)
        };
        result.map_err(|source| LoadError::InvalidArtifact {
            field,
            path: path.clone(),
            source,
        })?;
    }

    if let MeshIdSource::File(name) = &config.mesh_id_source {
        let path = directory.join(name);
        fs::write(&path, example.mesh_id().to_string())
            .map_err(|source| LoadError::Io { path, source })?;
    }

    if config.verbosity.logs_summary() {
        log::info!("Wrote {} to {:?}", example.mesh_id(), directory);
    }
    Ok(())
}

fn artifact_path(directory: &Path, field: Field, config: &LoaderConfig) -> PathBuf {
    // Every numeric field has a name; the mesh id never reaches here.
    directory.join(config.artifact_names.get(field).unwrap_or(field.name()))
}

fn load_field(directory: &Path, field: Field, config: &LoaderConfig) -> Result<FloatArray> {
    let path = artifact_path(directory, field, config);
    if !path.is_file() {
        return Err(LoadError::MissingArtifact { field, path });
    }
    let invalid = |source: ArtifactError| LoadError::InvalidArtifact {
        field,
        path: path.clone(),
        source,
    };

    let mut reader = File::open(&path)
        .map(BufReader::new)
        .map_err(|err| invalid(err.into()))?;
    let stored = read_artifact_shape_from(&mut reader).map_err(invalid)?;

    // Depth renders carry one extra leading capture axis on disk.
    let declared = if field == Field::DepthRenders {
        if stored.first() != Some(&1) {
            return Err(LoadError::SingleViewExpected {
                path: path.clone(),
                got: stored,
            });
        }
        &stored[1..]
    } else {
        &stored[..]
    };
    if declared != field.shape() {
        return Err(LoadError::ShapeMismatch {
            field,
            expected: field.shape().to_vec(),
            got: declared.to_vec(),
            path: path.clone(),
        });
    }

    let array = read_artifact_values_from(&mut reader, stored.clone()).map_err(invalid)?;
    if field == Field::DepthRenders {
        array
            .squeeze_leading()
            .map_err(|_| LoadError::SingleViewExpected { path, got: stored })
    } else {
        Ok(array)
    }
}

fn resolve_mesh_id(directory: &Path, source: &MeshIdSource) -> Result<MeshId> {
    match source {
        MeshIdSource::DirectoryName => {
            let named = directory_components(directory).or_else(|| {
                fs::canonicalize(directory)
                    .ok()
                    .and_then(|canonical| directory_components(&canonical))
            });
            let (category, hash) = named.ok_or_else(|| LoadError::UnnamedDirectory {
                path: directory.to_path_buf(),
            })?;
            MeshId::new(category, hash).map_err(|source| LoadError::MalformedMeshId {
                path: directory.to_path_buf(),
                source,
            })
        }
        MeshIdSource::File(name) => {
            let path = directory.join(name);
            if !path.is_file() {
                return Err(LoadError::MissingArtifact {
                    field: Field::MeshId,
                    path,
                });
            }
            let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            MeshId::parse(text.trim()).map_err(|source| LoadError::MalformedMeshId { path, source })
        }
    }
}

/// `(parent name, own name)` of a directory path, if both are plain UTF-8 names.
fn directory_components(directory: &Path) -> Option<(String, String)> {
    let hash = directory.file_name()?.to_str()?;
    let category = directory.parent()?.file_name()?.to_str()?;
    Some((category.to_owned(), hash.to_owned()))
}
