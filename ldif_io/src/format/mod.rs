//! Binary formats: per-field artifacts, shape-example records and record streams.
//!
//! # Example
//!
//! ```ignore
//! use ldif_io::{decode, encode, load_example, LoaderConfig};
//!
//! let example = load_example("data/train/04090263/22", &LoaderConfig::default())?;
//! let bytes = encode(&example);
//! let restored = decode(&bytes)?;
//! assert_eq!(restored, example);
//! ```

pub mod artifact;
pub mod header;
pub mod record;
pub mod stream;

pub use artifact::{
    read_artifact, read_artifact_from, read_artifact_shape_from, read_artifact_values_from,
    write_artifact, write_artifact_to, MAX_ARTIFACT_RANK,
};
pub use header::{
    ArtifactHeader, RecordHeader, ARTIFACT_MAGIC, RECORD_HEADER_SIZE, RECORD_MAGIC, RECORD_VERSION,
};
pub use record::{decode, encode, encoded_len};
pub use stream::{read_records_from_file, write_records_to_file, RecordReader, RecordWriter};
