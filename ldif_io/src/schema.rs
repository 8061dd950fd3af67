//! The fixed record schema shared by encoding, decoding and loading.
//!
//! Field order, shapes and element types are declared once in a static
//! table. [`full_schema`] validates that table on first use and caches
//! the derived data (element counts, fingerprint), so every encode, decode
//! and buffer pre-allocation sees the same `&'static Schema`.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use ldif_core::element_count;

use crate::error::SchemaError;

/// Number of bounding-volume samples per example.
pub const BOUNDING_BOX_SAMPLE_COUNT: usize = 100_000;
/// Number of near-surface samples per example.
pub const NEAR_SURFACE_SAMPLE_COUNT: usize = 100_000;
/// Number of oriented surface samples per example.
pub const SURFACE_POINT_SAMPLE_COUNT: usize = 10_000;
/// Number of fixed depth viewpoints.
pub const DEPTH_VIEW_COUNT: usize = 20;
/// Depth render resolution (square).
pub const DEPTH_RESOLUTION: usize = 224;
/// Voxel grid resolution per axis.
pub const GRID_RESOLUTION: usize = 32;

/// Element type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Flat row-major little-endian f32 values.
    Float32,
    /// Length-delimited UTF-8 bytes.
    Utf8String,
}

impl ElementType {
    /// Tag byte written before the field payload.
    pub const fn tag(self) -> u8 {
        match self {
            ElementType::Float32 => 0,
            ElementType::Utf8String => 1,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ElementType::Float32),
            1 => Some(ElementType::Utf8String),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Float32 => write!(f, "float32"),
            ElementType::Utf8String => write!(f, "utf8 string"),
        }
    }
}

/// The seven fields of a shape example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// (x, y, z, value) samples over the bounding volume.
    BoundingBoxSamples,
    /// One depth image per fixed viewpoint.
    DepthRenders,
    /// `"{tag}|{hash}"` identifier.
    MeshId,
    /// (x, y, z, value) samples near the surface.
    NearSurfaceSamples,
    /// Voxelized implicit field.
    Grid,
    /// Homogeneous world-to-grid transform.
    World2Grid,
    /// (x, y, z, nx, ny, nz) samples on the surface.
    SurfacePointSamples,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 7] = [
        Field::BoundingBoxSamples,
        Field::DepthRenders,
        Field::MeshId,
        Field::NearSurfaceSamples,
        Field::Grid,
        Field::World2Grid,
        Field::SurfacePointSamples,
    ];

    /// The six numeric fields in record order.
    pub const NUMERIC: [Field; 6] = [
        Field::BoundingBoxSamples,
        Field::DepthRenders,
        Field::NearSurfaceSamples,
        Field::Grid,
        Field::World2Grid,
        Field::SurfacePointSamples,
    ];

    /// Record field name.
    pub const fn name(self) -> &'static str {
        match self {
            Field::BoundingBoxSamples => "bounding_box_samples",
            Field::DepthRenders => "depth_renders",
            Field::MeshId => "mesh_id",
            Field::NearSurfaceSamples => "near_surface_samples",
            Field::Grid => "grid",
            Field::World2Grid => "world2grid",
            Field::SurfacePointSamples => "surface_point_samples",
        }
    }

    /// Declared shape (empty for the scalar mesh id).
    pub const fn shape(self) -> &'static [usize] {
        match self {
            Field::BoundingBoxSamples => &[BOUNDING_BOX_SAMPLE_COUNT, 4],
            Field::DepthRenders => &[DEPTH_VIEW_COUNT, DEPTH_RESOLUTION, DEPTH_RESOLUTION, 1],
            Field::MeshId => &[],
            Field::NearSurfaceSamples => &[NEAR_SURFACE_SAMPLE_COUNT, 4],
            Field::Grid => &[GRID_RESOLUTION, GRID_RESOLUTION, GRID_RESOLUTION],
            Field::World2Grid => &[4, 4],
            Field::SurfacePointSamples => &[SURFACE_POINT_SAMPLE_COUNT, 6],
        }
    }

    /// Declared element type.
    pub const fn element_type(self) -> ElementType {
        match self {
            Field::MeshId => ElementType::Utf8String,
            _ => ElementType::Float32,
        }
    }

    /// Number of declared f32 values (1 for the scalar mesh id).
    pub fn element_count(self) -> usize {
        element_count(self.shape())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One schema entry: field name, fixed shape and element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Which field this entry declares.
    pub field: Field,
    /// Record field name.
    pub name: &'static str,
    /// Fixed shape.
    pub shape: &'static [usize],
    /// Element type.
    pub element_type: ElementType,
}

impl FieldSpec {
    /// Spec entry for `field`.
    pub const fn of(field: Field) -> Self {
        Self {
            field,
            name: field.name(),
            shape: field.shape(),
            element_type: field.element_type(),
        }
    }

    /// Number of values the shape describes.
    pub fn element_count(&self) -> usize {
        element_count(self.shape)
    }
}

static FIELD_SPECS: [FieldSpec; 7] = [
    FieldSpec::of(Field::BoundingBoxSamples),
    FieldSpec::of(Field::DepthRenders),
    FieldSpec::of(Field::MeshId),
    FieldSpec::of(Field::NearSurfaceSamples),
    FieldSpec::of(Field::Grid),
    FieldSpec::of(Field::World2Grid),
    FieldSpec::of(Field::SurfacePointSamples),
];

static FULL_SCHEMA: OnceLock<Schema> = OnceLock::new();

/// The shared record schema.
///
/// Built and validated on first call; every later call returns the same
/// instance.
pub fn full_schema() -> &'static Schema {
    FULL_SCHEMA.get_or_init(|| match Schema::new(&FIELD_SPECS) {
        Ok(schema) => schema,
        Err(err) => panic!("built-in record schema is invalid: {err}"),
    })
}

/// A validated, ordered set of field declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [FieldSpec],
    fingerprint: u64,
    float_count: usize,
}

impl Schema {
    /// Validate a field table.
    ///
    /// # Errors
    /// Returns `InvalidSchema` if names repeat, a numeric field has an empty
    /// or zero-sized shape, or a string field is not scalar.
    pub fn new(fields: &'static [FieldSpec]) -> Result<Self, SchemaError> {
        let mut names = HashSet::with_capacity(fields.len());
        for spec in fields {
            if !names.insert(spec.name) {
                return Err(SchemaError::InvalidSchema {
                    message: format!("duplicate field name `{}`", spec.name),
                });
            }
            match spec.element_type {
                ElementType::Float32 => {
                    if spec.shape.is_empty() || spec.element_count() == 0 {
                        return Err(SchemaError::InvalidSchema {
                            message: format!(
                                "numeric field `{}` has degenerate shape {:?}",
                                spec.name, spec.shape
                            ),
                        });
                    }
                    if u32::try_from(spec.element_count()).is_err() {
                        return Err(SchemaError::InvalidSchema {
                            message: format!("field `{}` is too large for a u32 count", spec.name),
                        });
                    }
                }
                ElementType::Utf8String => {
                    if !spec.shape.is_empty() {
                        return Err(SchemaError::InvalidSchema {
                            message: format!("string field `{}` must be scalar", spec.name),
                        });
                    }
                }
            }
        }
        if fields.len() > u16::MAX as usize {
            return Err(SchemaError::InvalidSchema {
                message: format!("{} fields exceed the u16 field count", fields.len()),
            });
        }

        let float_count = fields
            .iter()
            .filter(|spec| spec.element_type == ElementType::Float32)
            .map(FieldSpec::element_count)
            .sum();

        Ok(Self {
            fields,
            fingerprint: fingerprint(fields),
            float_count,
        })
    }

    /// Field declarations in record order.
    #[inline]
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field declaration by name.
    pub fn get(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Look up the declaration for `field`.
    pub fn spec(&self, field: Field) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    /// 64-bit FNV-1a digest of names, element types and shapes, in order.
    ///
    /// Written into every record header; decoding refuses records whose
    /// fingerprint differs.
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Total number of f32 values across all numeric fields.
    #[inline]
    pub fn float_count(&self) -> usize {
        self.float_count
    }
}

// FNV-1a constants
const FNV_OFFSET_64: u64 = 0xcbf29ce484222325;
const FNV_PRIME_64: u64 = 0x00000100000001b3;

fn fnv1a_64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME_64);
    }
    hash
}

fn fingerprint(fields: &[FieldSpec]) -> u64 {
    let mut hash = FNV_OFFSET_64;
    for spec in fields {
        hash = fnv1a_64_extend(hash, spec.name.as_bytes());
        hash = fnv1a_64_extend(hash, &[0, spec.element_type.tag()]);
        hash = fnv1a_64_extend(hash, &(spec.shape.len() as u64).to_le_bytes());
        for &dim in spec.shape {
            hash = fnv1a_64_extend(hash, &(dim as u64).to_le_bytes());
        }
    }
    hash
}
