//! ldif_io - loading, encoding and streaming of LDIF shape examples.
//!
//! A shape example bundles everything the training pipeline knows about one
//! mesh: volume and near-surface samples, depth renders, a voxel grid with its
//! world-to-grid transform, and oriented surface samples. This crate loads
//! examples from per-shape artifact directories and converts them to and from
//! a schema-checked binary record.
//!
//! # Core Types
//!
//! - [`ShapeExample`]: One fully shape-checked example
//! - [`MeshId`]: The `"category|hash"` identifier of the source mesh
//! - [`Schema`]: The field table shared by [`encode`] and [`decode`]
//! - [`LoaderConfig`]: Artifact names, mesh id resolution and verbosity
//!
//! # Example
//!
//! ```ignore
//! use ldif_io::{decode, encode, load_example, LoaderConfig, Verbosity};
//!
//! let config = LoaderConfig::new().with_verbosity(Verbosity::Verbose);
//! let example = load_example("data/train/04090263/22", &config)?;
//! assert_eq!(example.grid().shape(), &[32, 32, 32]);
//!
//! let bytes = encode(&example);
//! assert_eq!(decode(&bytes)?, example);
//! ```
//!
//! # Logging
//!
//! Load calls log through the `log` facade. Nothing is printed unless the
//! application installs a logger; [`Verbosity`] further limits what a given
//! call emits.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod example;
pub mod format;
pub mod loader;
pub mod schema;

// Re-export the math types examples are built from
pub use ldif_core::{FloatArray, Mat4};

// Re-export main types
pub use config::{ArtifactNames, LoaderConfig, MeshIdSource, Verbosity};
pub use error::{
    ArtifactError, ExampleError, LoadError, MeshIdError, RecordError, Result, SchemaError,
};
pub use example::{MeshId, ShapeExample, ShapeExampleBuilder, ShapeExampleParts};
pub use loader::{example_directory_from_mesh_path, load_example, write_example, MESH_FILE_NAME};
pub use schema::{full_schema, ElementType, Field, FieldSpec, Schema};

// Re-export format types
pub use format::{
    decode, encode, encoded_len, read_artifact, read_records_from_file, write_artifact,
    write_records_to_file, RecordReader, RecordWriter,
};
