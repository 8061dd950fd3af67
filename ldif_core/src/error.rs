//! Error types for ldif_core operations.
//!
//! Provides simple error enums with no external dependencies for no_std compatibility.

use core::fmt;

use crate::alloc_prelude::Vec;

/// Which derived camera vector collapsed in a degenerate `look_at` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Eye and center coincide, so the forward vector has no direction.
    EyeAtCenter,
    /// The gaze is parallel to the up vector, or the up vector is degenerate.
    UpParallelToGaze,
}

/// Errors that can occur while building camera matrices or rotations.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// A batch row produced a near-zero forward or side vector.
    DegenerateCamera {
        /// Index of the first offending row in the batch.
        row: usize,
        /// Which vector collapsed.
        kind: Degeneracy,
        /// Norm of the collapsed vector before normalization.
        norm: f32,
    },
    /// The eye, center and up batches have different lengths.
    BatchSizeMismatch {
        /// Number of eye positions.
        eye: usize,
        /// Number of center positions.
        center: usize,
        /// Number of up vectors.
        world_up: usize,
    },
    /// Euler angle input must have shape `[..., 3]`.
    InvalidAngleShape {
        /// The shape that was provided.
        shape: Vec<usize>,
    },
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DegenerateCamera { row, kind, norm } => match kind {
                Degeneracy::EyeAtCenter => write!(
                    f,
                    "camera matrix is degenerate because eye and center are close (row {}, |center - eye| = {:e})",
                    row, norm
                ),
                Degeneracy::UpParallelToGaze => write!(
                    f,
                    "camera matrix is degenerate because up and gaze are close or up is degenerate (row {}, |forward x up| = {:e})",
                    row, norm
                ),
            },
            CameraError::BatchSizeMismatch {
                eye,
                center,
                world_up,
            } => write!(
                f,
                "batch size mismatch: eye has {} rows, center has {}, world_up has {}",
                eye, center, world_up
            ),
            CameraError::InvalidAngleShape { shape } => {
                write!(f, "expected angles of shape [..., 3], got {:?}", shape)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CameraError {}

/// Errors from constructing or reshaping a [`FloatArray`](crate::FloatArray).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// The buffer length does not equal the product of the shape.
    LengthMismatch {
        /// Declared shape.
        shape: Vec<usize>,
        /// Actual number of values.
        len: usize,
    },
    /// A leading axis was expected to have size 1.
    LeadingAxisNotSingleton {
        /// The full shape of the array.
        shape: Vec<usize>,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::LengthMismatch { shape, len } => write!(
                f,
                "shape {:?} requires {} values, got {}",
                shape,
                shape.iter().product::<usize>(),
                len
            ),
            ArrayError::LeadingAxisNotSingleton { shape } => {
                write!(f, "expected a leading axis of size 1, got shape {:?}", shape)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArrayError {}
