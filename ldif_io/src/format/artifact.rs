//! Per-field tensor artifact files.
//!
//! Each numeric field of an example directory is stored as one artifact:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HEADER (8 bytes)                             │
//! │  0-3:  Magic "LDTA"                          │
//! │  4-5:  version (u16 LE)                      │
//! │  6-7:  rank (u16 LE)                         │
//! ├──────────────────────────────────────────────┤
//! │ DIMENSIONS (4 bytes per axis, u32 LE)        │
//! ├──────────────────────────────────────────────┤
//! │ VALUES (product(dims) × f32 LE, row-major)   │
//! └──────────────────────────────────────────────┘
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ldif_core::FloatArray;

use super::header::{ArtifactHeader, ARTIFACT_HEADER_SIZE, ARTIFACT_VERSION};
use crate::error::ArtifactError;

/// Highest rank an artifact may declare.
pub const MAX_ARTIFACT_RANK: usize = 8;

/// Write an array in artifact format.
///
/// # Errors
/// `RankTooLarge` if the array has more than [`MAX_ARTIFACT_RANK`] axes or
/// `Oversized` if a dimension does not fit in a u32.
pub fn write_artifact_to<W: Write>(array: &FloatArray, writer: &mut W) -> Result<(), ArtifactError> {
    if array.rank() > MAX_ARTIFACT_RANK {
        return Err(ArtifactError::RankTooLarge {
            rank: array.rank(),
            max: MAX_ARTIFACT_RANK,
        });
    }

    writer.write_all(&ArtifactHeader::new(array.rank() as u16).to_bytes())?;
    for &dim in array.shape() {
        let dim = u32::try_from(dim).map_err(|_| ArtifactError::Oversized {
            shape: array.shape().to_vec(),
        })?;
        writer.write_all(&dim.to_le_bytes())?;
    }
    for &value in array.as_slice() {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Read an array in artifact format, consuming the reader to its end.
///
/// # Errors
/// Bad magic, unsupported version, an oversized rank or shape, a payload
/// shorter than the shape requires, or bytes after the payload.
pub fn read_artifact_from<R: Read>(reader: &mut R) -> Result<FloatArray, ArtifactError> {
    let shape = read_artifact_shape_from(reader)?;
    read_artifact_values_from(reader, shape)
}

/// Read only the header and dimensions of an artifact, leaving the reader
/// at the start of the values.
///
/// # Errors
/// Bad magic, unsupported version or a rank above [`MAX_ARTIFACT_RANK`].
pub fn read_artifact_shape_from<R: Read>(reader: &mut R) -> Result<Vec<usize>, ArtifactError> {
    let mut header_bytes = [0u8; ARTIFACT_HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = ArtifactHeader::from_bytes(&header_bytes);

    if !header.is_valid() {
        return Err(ArtifactError::InvalidMagic {
            found: header.magic,
        });
    }
    if header.version != ARTIFACT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found: header.version,
        });
    }
    let rank = header.rank as usize;
    if rank > MAX_ARTIFACT_RANK {
        return Err(ArtifactError::RankTooLarge {
            rank,
            max: MAX_ARTIFACT_RANK,
        });
    }

    let mut shape = Vec::with_capacity(rank);
    for _ in 0..rank {
        let mut dim = [0u8; 4];
        reader.read_exact(&mut dim)?;
        shape.push(u32::from_le_bytes(dim) as usize);
    }
    Ok(shape)
}

/// Read the values of an artifact whose dimensions were already read with
/// [`read_artifact_shape_from`], consuming the reader to its end.
///
/// # Errors
/// An oversized shape, a payload shorter than the shape requires, or bytes
/// after the payload.
pub fn read_artifact_values_from<R: Read>(
    reader: &mut R,
    shape: Vec<usize>,
) -> Result<FloatArray, ArtifactError> {
    let expected = shape
        .iter()
        .try_fold(4usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| ArtifactError::Oversized {
            shape: shape.clone(),
        })?;

    // Grow the buffer as bytes arrive instead of trusting the header size.
    let mut payload = Vec::new();
    Read::take(&mut *reader, expected as u64).read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(ArtifactError::Truncated {
            expected,
            got: payload.len(),
        });
    }
    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(ArtifactError::TrailingBytes);
    }

    let values = payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok(FloatArray::new(shape, values)?)
}

/// Write an array to an artifact file.
pub fn write_artifact<P: AsRef<Path>>(path: P, array: &FloatArray) -> Result<(), ArtifactError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_artifact_to(array, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read an array from an artifact file.
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<FloatArray, ArtifactError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_artifact_from(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn encode(array: &FloatArray) -> Vec<u8> {
        let mut buffer = Vec::new();
        write_artifact_to(array, &mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_layout() {
        let array = FloatArray::new(vec![2, 1], vec![1.0, -2.5]).unwrap();
        let bytes = encode(&array);
        assert_eq!(bytes.len(), 8 + 2 * 4 + 2 * 4);
        assert_eq!(&bytes[0..4], b"LDTA");
        assert_eq!(&bytes[6..8], &[2, 0]);
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_roundtrip_preserves_bits() {
        let array = FloatArray::new(
            vec![2, 3],
            vec![0.0, -0.0, f32::MIN_POSITIVE, 1e-30, f32::MAX, -7.25],
        )
        .unwrap();
        let loaded = read_artifact_from(&mut Cursor::new(encode(&array))).unwrap();
        assert_eq!(loaded.shape(), array.shape());
        for (a, b) in loaded.as_slice().iter().zip(array.as_slice()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = encode(&FloatArray::zeros(&[1]));
        bytes[0..4].copy_from_slice(b"BADM");
        let result = read_artifact_from(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(ArtifactError::InvalidMagic { found }) if &found == b"BADM"));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(&FloatArray::zeros(&[1]));
        bytes[4..6].copy_from_slice(&9u16.to_le_bytes());
        let result = read_artifact_from(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(ArtifactError::UnsupportedVersion { found: 9 })));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = encode(&FloatArray::zeros(&[4, 4]));
        bytes.truncate(bytes.len() - 3);
        let result = read_artifact_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(ArtifactError::Truncated {
                expected: 64,
                got: 61
            })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode(&FloatArray::zeros(&[4]));
        bytes.push(0);
        let result = read_artifact_from(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(ArtifactError::TrailingBytes)));
    }

    #[test]
    fn test_oversized_shape_does_not_allocate() {
        let mut bytes = ArtifactHeader::new(3).to_bytes().to_vec();
        for _ in 0..3 {
            bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        }
        let result = read_artifact_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(ArtifactError::Oversized { .. }) | Err(ArtifactError::Truncated { .. })
        ));
    }

    #[test]
    fn test_shape_is_read_before_values() {
        let mut bytes = encode(&FloatArray::zeros(&[2, 5]));
        bytes.truncate(bytes.len() - 7);
        let mut cursor = Cursor::new(bytes);
        assert_eq!(read_artifact_shape_from(&mut cursor).unwrap(), vec![2, 5]);
        assert!(matches!(
            read_artifact_values_from(&mut cursor, vec![2, 5]),
            Err(ArtifactError::Truncated {
                expected: 40,
                got: 33
            })
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.ldta");
        let array = FloatArray::from_fn(&[3, 3, 3], |i| i as f32 * 0.5);
        write_artifact(&path, &array).unwrap();
        assert_eq!(read_artifact(&path).unwrap(), array);
    }
}
