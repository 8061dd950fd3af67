//! Error types for ldif_io operations.
//!
//! Every variant names the field, path, shape or byte offset involved so a
//! failure can be diagnosed without re-running the load.

use std::io;
use std::path::PathBuf;

use ldif_core::ArrayError;
use thiserror::Error;

use crate::schema::{ElementType, Field};

/// A mesh id that does not split into exactly `{tag}|{hash}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshIdError {
    /// No `|` separator.
    #[error("mesh id `{value}` has no `|` separator")]
    MissingSeparator {
        /// The rejected text.
        value: String,
    },
    /// More than one `|` separator.
    #[error("mesh id `{value}` has more than one `|` separator")]
    TooManySeparators {
        /// The rejected text.
        value: String,
    },
    /// The category/split tag is empty.
    #[error("mesh id `{value}` has an empty category")]
    EmptyCategory {
        /// The rejected text.
        value: String,
    },
    /// The shape hash is empty.
    #[error("mesh id `{value}` has an empty shape hash")]
    EmptyHash {
        /// The rejected text.
        value: String,
    },
}

/// Errors from assembling a [`ShapeExample`](crate::ShapeExample).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExampleError {
    /// A numeric field was never provided to the builder.
    #[error("missing field `{field}`")]
    MissingField {
        /// The absent field.
        field: Field,
    },
    /// A numeric field has the wrong shape.
    #[error("field `{field}` has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// The offending field.
        field: Field,
        /// Declared shape.
        expected: Vec<usize>,
        /// Provided shape.
        got: Vec<usize>,
    },
    /// The mesh id is not a numeric field and cannot hold an array.
    #[error("field `{field}` does not hold an array")]
    NotNumeric {
        /// The field that was given an array.
        field: Field,
    },
}

/// Errors reading or writing a single tensor artifact file.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with the artifact magic bytes.
    #[error("invalid magic bytes {found:?} (expected LDTA)")]
    InvalidMagic {
        /// The four bytes found.
        found: [u8; 4],
    },

    /// The format version is not supported.
    #[error("unsupported artifact version {found}")]
    UnsupportedVersion {
        /// The version found.
        found: u16,
    },

    /// The declared rank exceeds the supported maximum.
    #[error("artifact rank {rank} exceeds the maximum of {max}")]
    RankTooLarge {
        /// Declared rank.
        rank: usize,
        /// Maximum supported rank.
        max: usize,
    },

    /// The declared dimensions overflow the addressable size.
    #[error("artifact shape {shape:?} is too large")]
    Oversized {
        /// Declared shape.
        shape: Vec<usize>,
    },

    /// The payload ended before all declared values were read.
    #[error("artifact truncated: expected {expected} payload bytes, got {got}")]
    Truncated {
        /// Bytes required by the declared shape.
        expected: usize,
        /// Bytes actually present.
        got: usize,
    },

    /// Extra bytes follow the declared payload.
    #[error("artifact has trailing bytes after the declared payload")]
    TrailingBytes,

    /// The values do not fit the declared shape.
    #[error(transparent)]
    Array(#[from] ArrayError),
}

/// Errors loading (or writing) one per-shape example directory.
///
/// Fatal for that example; the caller decides whether to skip it or abort
/// the batch.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The example directory does not exist or is not a directory.
    #[error("example directory {path:?} does not exist")]
    DirectoryNotFound {
        /// The directory given.
        path: PathBuf,
    },

    /// An expected artifact file is absent.
    #[error("missing artifact for `{field}`: {path:?}")]
    MissingArtifact {
        /// The field whose artifact is missing.
        field: Field,
        /// Where it was expected.
        path: PathBuf,
    },

    /// An artifact file exists but could not be read or parsed.
    #[error("invalid artifact for `{field}` at {path:?}: {source}")]
    InvalidArtifact {
        /// The field being loaded.
        field: Field,
        /// The artifact file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: ArtifactError,
    },

    /// A loaded array does not have its declared shape.
    #[error("artifact for `{field}` at {path:?} has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// The field being loaded.
        field: Field,
        /// The artifact file.
        path: PathBuf,
        /// Declared shape.
        expected: Vec<usize>,
        /// Shape found on disk.
        got: Vec<usize>,
    },

    /// The depth renders do not carry exactly one capture.
    #[error("depth renders at {path:?} have shape {got:?}; expected a leading batch axis of exactly 1")]
    SingleViewExpected {
        /// The artifact file.
        path: PathBuf,
        /// Shape found on disk.
        got: Vec<usize>,
    },

    /// The mesh id could not be resolved or parsed.
    #[error("malformed mesh id for {path:?}: {source}")]
    MalformedMeshId {
        /// The directory or mesh id file.
        path: PathBuf,
        /// Why parsing failed.
        #[source]
        source: MeshIdError,
    },

    /// The mesh id could not be derived from the directory path.
    #[error("cannot derive a mesh id from {path:?}: need `<tag>/<hash>` path components")]
    UnnamedDirectory {
        /// The directory given.
        path: PathBuf,
    },

    /// A path handed over as a mesh path does not name `mesh_orig.ply`.
    #[error("{path:?} is not a path to mesh_orig.ply")]
    NotAMeshPath {
        /// The rejected path.
        path: PathBuf,
    },

    /// Reading or writing a non-artifact file failed.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The loaded arrays did not assemble into a valid example.
    #[error(transparent)]
    Example(#[from] ExampleError),
}

/// A record whose bytes disagree with the schema.
///
/// Always fatal: the record is corrupted or was written with a different
/// schema, and nothing is decoded from it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The field table itself is invalid.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// What is wrong with the table.
        message: String,
    },

    /// The record does not start with the record magic bytes.
    #[error("invalid record magic {found:?} (expected LDRC)")]
    InvalidMagic {
        /// The four bytes found.
        found: [u8; 4],
    },

    /// Unsupported record format version.
    #[error("unsupported record version {found}")]
    UnsupportedVersion {
        /// The version found.
        found: u16,
    },

    /// The record was written with a different schema.
    #[error("schema fingerprint mismatch: expected {expected:#018x}, got {got:#018x}")]
    FingerprintMismatch {
        /// Fingerprint of [`full_schema`](crate::full_schema).
        expected: u64,
        /// Fingerprint stored in the record.
        got: u64,
    },

    /// The record declares a different number of fields.
    #[error("record has {got} fields, schema declares {expected}")]
    FieldCountMismatch {
        /// Fields in the schema.
        expected: usize,
        /// Fields declared by the record.
        got: usize,
    },

    /// A field appears out of order or under the wrong name.
    #[error("field {index}: expected `{expected}`, found `{got}`")]
    UnexpectedField {
        /// Position in the record.
        index: usize,
        /// Name declared by the schema.
        expected: &'static str,
        /// Name found in the record.
        got: String,
    },

    /// A field has the wrong element type tag.
    #[error("field `{field}`: expected {expected}, found type tag {got}")]
    ElementTypeMismatch {
        /// The field being decoded.
        field: &'static str,
        /// Declared element type.
        expected: ElementType,
        /// Tag found in the record.
        got: u8,
    },

    /// A numeric field's element count disagrees with its declared shape.
    #[error("field `{field}` with shape {shape:?}: expected {expected} values, record has {got}")]
    LengthMismatch {
        /// The field being decoded.
        field: &'static str,
        /// Declared shape.
        shape: &'static [usize],
        /// Values required by the shape.
        expected: usize,
        /// Values declared by the record.
        got: usize,
    },

    /// The record ends inside a field.
    #[error("record truncated in `{field}`: needed {needed} bytes at offset {offset}, {remaining} remain")]
    Truncated {
        /// The field (or header) being decoded.
        field: &'static str,
        /// Byte offset where the read started.
        offset: usize,
        /// Bytes required.
        needed: usize,
        /// Bytes left in the record.
        remaining: usize,
    },

    /// Bytes remain after the last field.
    #[error("record has {count} trailing bytes after the last field")]
    TrailingBytes {
        /// Number of extra bytes.
        count: usize,
    },

    /// A string field is not valid UTF-8.
    #[error("field `{field}` is not valid UTF-8")]
    InvalidUtf8 {
        /// The field being decoded.
        field: &'static str,
    },

    /// The decoded mesh id does not parse.
    #[error(transparent)]
    InvalidMeshId(#[from] MeshIdError),

    /// The decoded arrays did not assemble into a valid example.
    #[error(transparent)]
    Example(#[from] ExampleError),
}

/// Errors reading or writing a stream of framed records.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record body failed schema validation.
    #[error("record {index}: {source}")]
    Schema {
        /// Zero-based position of the record in the stream.
        index: usize,
        /// The decoding failure.
        #[source]
        source: SchemaError,
    },

    /// The stream ended inside a length prefix or record body.
    #[error("record {index} truncated: expected {expected} bytes, got {got}")]
    Truncated {
        /// Zero-based position of the record in the stream.
        index: usize,
        /// Bytes announced.
        expected: u64,
        /// Bytes present.
        got: u64,
    },
}

/// Result type alias for example loading.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::LengthMismatch {
            field: "grid",
            shape: &[32, 32, 32],
            expected: 32768,
            got: 4096,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("grid"));
        assert!(msg.contains("32768"));
        assert!(msg.contains("4096"));

        let err = LoadError::MissingArtifact {
            field: Field::Grid,
            path: PathBuf::from("/data/a/b/grid.ldta"),
        };
        assert!(format!("{}", err).contains("`grid`"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            SchemaError::TrailingBytes { count: 3 },
            SchemaError::TrailingBytes { count: 3 }
        );
        assert_ne!(
            SchemaError::TrailingBytes { count: 3 },
            SchemaError::TrailingBytes { count: 4 }
        );
    }

    #[test]
    fn test_artifact_error_from_io() {
        let err: ArtifactError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, ArtifactError::Io(_)));
    }
}
