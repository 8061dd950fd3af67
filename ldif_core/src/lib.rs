//! # ldif_core
//!
//! Pure math for LDIF shape examples.
//!
//! This crate holds the pieces of the shape-example pipeline that have no I/O:
//! camera extrinsics for the depth renders, Euler-angle rotations, and the
//! shaped f32 buffer every numeric field is stored in.
//!
//! ## Features
//!
//! - **no_std compatible**: only needs `alloc`
//! - **All-or-nothing batches**: a degenerate camera anywhere in a batch fails the call
//! - **Arbitrary batch shapes**: rotations accept any leading dimensions
//!
//! ## Feature Flags
//!
//! - `std` (default): implements `std::error::Error` for the error types
//!
//! ## Modules
//!
//! - [`types`]: `Vec3`, `Mat3`, `Mat4`
//! - [`array`]: `FloatArray`, a row-major f32 buffer with a shape
//! - [`camera`]: `look_at` and roll-pitch-yaw rotations
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use ldif_core::prelude::*;
//!
//! let extrinsics = look_at(
//!     &[Vec3::new(0.0, 0.0, -5.0)],
//!     &[Vec3::ZERO],
//!     &[Vec3::new(0.0, 1.0, 0.0)],
//! )?;
//!
//! let angles = FloatArray::new(vec![2, 3], vec![0.0, 0.0, 0.0, 0.1, 0.2, 0.3])?;
//! let rotations = roll_pitch_yaw_to_rotation_matrices(&angles)?; // shape [2, 3, 3]
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod alloc_prelude {
    pub use alloc::vec;
    pub use alloc::vec::Vec;
}

pub mod array;
pub mod camera;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::array::{element_count, FloatArray};
    pub use crate::camera::{
        camera_position, look_at, look_at_single, roll_pitch_yaw_to_rotation_matrices,
        rotation_from_roll_pitch_yaw, VECTOR_DEGENERACY_CUTOFF,
    };
    pub use crate::error::{ArrayError, CameraError, Degeneracy};
    pub use crate::types::{Mat3, Mat4, Vec3};
}

// Re-export everything at crate root for convenience
pub use array::{element_count, FloatArray};
pub use camera::{
    camera_position, look_at, look_at_single, roll_pitch_yaw_to_rotation_matrices,
    rotation_from_roll_pitch_yaw, VECTOR_DEGENERACY_CUTOFF,
};
pub use error::{ArrayError, CameraError, Degeneracy};
pub use types::{Mat3, Mat4, Vec3};
