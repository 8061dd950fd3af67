//! Fixed-size headers of the record and artifact formats.

/// Magic bytes of an encoded shape-example record.
pub const RECORD_MAGIC: [u8; 4] = *b"LDRC";

/// Current record format version.
pub const RECORD_VERSION: u16 = 1;

/// Record header size in bytes.
pub const RECORD_HEADER_SIZE: usize = 16;

/// Magic bytes of a per-field artifact file.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"LDTA";

/// Current artifact format version.
pub const ARTIFACT_VERSION: u16 = 1;

/// Size of the fixed part of an artifact header (before the dimensions).
pub const ARTIFACT_HEADER_SIZE: usize = 8;

/// Record header.
///
/// Layout (16 bytes total):
/// - Bytes 0-3: Magic "LDRC"
/// - Bytes 4-5: version (u16 LE)
/// - Bytes 6-7: field_count (u16 LE)
/// - Bytes 8-15: schema fingerprint (u64 LE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Magic bytes "LDRC".
    pub magic: [u8; 4],
    /// Format version.
    pub version: u16,
    /// Number of fields that follow.
    pub field_count: u16,
    /// Fingerprint of the schema the record was written with.
    pub fingerprint: u64,
}

impl RecordHeader {
    /// Create a header for the current version.
    pub fn new(field_count: u16, fingerprint: u64) -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            field_count,
            fingerprint,
        }
    }

    /// Validate the magic bytes.
    pub fn is_valid(&self) -> bool {
        self.magic == RECORD_MAGIC
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_HEADER_SIZE] {
        let mut bytes = [0u8; RECORD_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.field_count.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.fingerprint.to_le_bytes());
        bytes
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8; RECORD_HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut fingerprint = [0u8; 8];
        fingerprint.copy_from_slice(&bytes[8..16]);

        Self {
            magic,
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            field_count: u16::from_le_bytes([bytes[6], bytes[7]]),
            fingerprint: u64::from_le_bytes(fingerprint),
        }
    }
}

/// Fixed part of an artifact header; `rank` u32 dimensions follow it.
///
/// Layout (8 bytes):
/// - Bytes 0-3: Magic "LDTA"
/// - Bytes 4-5: version (u16 LE)
/// - Bytes 6-7: rank (u16 LE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    /// Magic bytes "LDTA".
    pub magic: [u8; 4],
    /// Format version.
    pub version: u16,
    /// Number of dimensions that follow.
    pub rank: u16,
}

impl ArtifactHeader {
    /// Create a header for the current version.
    pub fn new(rank: u16) -> Self {
        Self {
            magic: ARTIFACT_MAGIC,
            version: ARTIFACT_VERSION,
            rank,
        }
    }

    /// Validate the magic bytes.
    pub fn is_valid(&self) -> bool {
        self.magic == ARTIFACT_MAGIC
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; ARTIFACT_HEADER_SIZE] {
        let mut bytes = [0u8; ARTIFACT_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.rank.to_le_bytes());
        bytes
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8; ARTIFACT_HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Self {
            magic,
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            rank: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_header_layout() {
        let header = RecordHeader::new(7, 0x0102030405060708);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"LDRC");
        assert_eq!(&bytes[4..6], &[1, 0]);
        assert_eq!(&bytes[6..8], &[7, 0]);
        assert_eq!(&bytes[8..16], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(RecordHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn test_record_header_magic() {
        let header = RecordHeader::new(7, 0);
        assert!(header.is_valid());

        let mut bad = header;
        bad.magic = *b"BADM";
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_artifact_header_layout() {
        let header = ArtifactHeader::new(3);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"LDTA");
        assert_eq!(ArtifactHeader::from_bytes(&bytes), header);
        assert!(header.is_valid());
    }
}
