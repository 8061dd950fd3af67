//! Shape-example record encoding.
//!
//! # Format Specification
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ HEADER (16 bytes)                                                  │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  0-3:   Magic "LDRC" (4 bytes)                                     │
//! │  4-5:   version (u16 LE)                                           │
//! │  6-7:   field_count (u16 LE)                                       │
//! │  8-15:  schema fingerprint (u64 LE)                                │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ FIELDS (schema order)                                              │
//! │  u16 LE name length, name bytes (UTF-8)                            │
//! │  u8     element type tag (0 = float32, 1 = utf8 string)            │
//! │  u32 LE element count (float32) or byte length (string)            │
//! │  payload: count × f32 LE (row-major), or the string bytes          │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Encoding and decoding both walk [`full_schema`]; nothing about the
//! layout is decided per call.

use ldif_core::FloatArray;

use super::header::{RecordHeader, RECORD_HEADER_SIZE, RECORD_VERSION};
use crate::error::SchemaError;
use crate::example::{MeshId, ShapeExample};
use crate::schema::{full_schema, ElementType, Field, FieldSpec};

/// Exact encoded size of an example whose mesh id is `mesh_id_len` bytes.
pub fn encoded_len(mesh_id_len: usize) -> usize {
    let schema = full_schema();
    let field_headers: usize = schema
        .fields()
        .iter()
        .map(|spec| 2 + spec.name.len() + 1 + 4)
        .sum();
    RECORD_HEADER_SIZE + field_headers + schema.float_count() * 4 + mesh_id_len
}

/// Serialize an example into a record.
///
/// Infallible: a [`ShapeExample`] already has every field at its declared
/// shape.
pub fn encode(example: &ShapeExample) -> Vec<u8> {
    let schema = full_schema();
    let mesh_id = example.mesh_id().to_string();
    let mut out = Vec::with_capacity(encoded_len(mesh_id.len()));

    out.extend_from_slice(&RecordHeader::new(schema.len() as u16, schema.fingerprint()).to_bytes());

    for spec in schema.fields() {
        out.extend_from_slice(&(spec.name.len() as u16).to_le_bytes());
        out.extend_from_slice(spec.name.as_bytes());
        out.push(spec.element_type.tag());

        match spec.element_type {
            ElementType::Float32 => {
                let values = match example.array(spec.field) {
                    Some(array) => array.as_slice(),
                    None => unreachable!("float32 field `{}` has no array", spec.name),
                };
                out.extend_from_slice(&(values.len() as u32).to_le_bytes());
                for &value in values {
                    out.extend_from_slice(&value.to_le_bytes());
                }
            }
            ElementType::Utf8String => {
                out.extend_from_slice(&(mesh_id.len() as u32).to_le_bytes());
                out.extend_from_slice(mesh_id.as_bytes());
            }
        }
    }

    out
}

/// Parse a record strictly according to [`full_schema`].
///
/// # Errors
/// Any disagreement between the bytes and the schema is a [`SchemaError`];
/// no field is truncated, padded or partially returned.
pub fn decode(bytes: &[u8]) -> Result<ShapeExample, SchemaError> {
    let schema = full_schema();
    let mut cursor = ByteCursor::new(bytes);

    let header_bytes: &[u8; RECORD_HEADER_SIZE] = cursor
        .take(RECORD_HEADER_SIZE, "header")?
        .try_into()
        .map_err(|_| SchemaError::Truncated {
            field: "header",
            offset: 0,
            needed: RECORD_HEADER_SIZE,
            remaining: bytes.len(),
        })?;
    let header = RecordHeader::from_bytes(header_bytes);

    if !header.is_valid() {
        return Err(SchemaError::InvalidMagic {
            found: header.magic,
        });
    }
    if header.version != RECORD_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: header.version,
        });
    }
    if header.fingerprint != schema.fingerprint() {
        return Err(SchemaError::FingerprintMismatch {
            expected: schema.fingerprint(),
            got: header.fingerprint,
        });
    }
    if header.field_count as usize != schema.len() {
        return Err(SchemaError::FieldCountMismatch {
            expected: schema.len(),
            got: header.field_count as usize,
        });
    }

    let mut mesh_id = None;
    let mut builder_arrays = Vec::with_capacity(Field::NUMERIC.len());

    for (index, spec) in schema.fields().iter().enumerate() {
        cursor.expect_field_header(index, spec)?;
        let count = cursor.read_u32(spec.name)? as usize;

        match spec.element_type {
            ElementType::Float32 => {
                let expected = spec.element_count();
                if count != expected {
                    return Err(SchemaError::LengthMismatch {
                        field: spec.name,
                        shape: spec.shape,
                        expected,
                        got: count,
                    });
                }
                let payload = cursor.take(count * 4, spec.name)?;
                let values = payload
                    .chunks_exact(4)
                    .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .collect();
                let array = FloatArray::new(spec.shape.to_vec(), values).map_err(|_| {
                    SchemaError::LengthMismatch {
                        field: spec.name,
                        shape: spec.shape,
                        expected,
                        got: count,
                    }
                })?;
                builder_arrays.push((spec.field, array));
            }
            ElementType::Utf8String => {
                let payload = cursor.take(count, spec.name)?;
                let text = std::str::from_utf8(payload)
                    .map_err(|_| SchemaError::InvalidUtf8 { field: spec.name })?;
                mesh_id = Some(MeshId::parse(text)?);
            }
        }
    }

    if cursor.remaining() != 0 {
        return Err(SchemaError::TrailingBytes {
            count: cursor.remaining(),
        });
    }

    let mesh_id = mesh_id.ok_or_else(|| SchemaError::InvalidSchema {
        message: "schema declares no mesh id field".to_owned(),
    })?;
    let builder = builder_arrays
        .into_iter()
        .fold(ShapeExample::builder(mesh_id), |builder, (field, array)| {
            builder.with_array(field, array)
        });
    Ok(builder.build()?)
}

/// Bounds-checked forward reader over a record.
struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, needed: usize, field: &'static str) -> Result<&'a [u8], SchemaError> {
        if needed > self.remaining() {
            return Err(SchemaError::Truncated {
                field,
                offset: self.offset,
                needed,
                remaining: self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, SchemaError> {
        Ok(self.take(1, field)?[0])
    }

    fn read_u16(&mut self, field: &'static str) -> Result<u16, SchemaError> {
        let b = self.take(2, field)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self, field: &'static str) -> Result<u32, SchemaError> {
        let b = self.take(4, field)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Check that the next field is `spec` by name and element type.
    fn expect_field_header(&mut self, index: usize, spec: &FieldSpec) -> Result<(), SchemaError> {
        let name_len = self.read_u16(spec.name)? as usize;
        let name = self.take(name_len, spec.name)?;
        if name != spec.name.as_bytes() {
            return Err(SchemaError::UnexpectedField {
                index,
                expected: spec.name,
                got: String::from_utf8_lossy(name).into_owned(),
            });
        }
        let tag = self.read_u8(spec.name)?;
        if tag != spec.element_type.tag() {
            return Err(SchemaError::ElementTypeMismatch {
                field: spec.name,
                expected: spec.element_type,
                got: tag,
            });
        }
        Ok(())
    }
}
