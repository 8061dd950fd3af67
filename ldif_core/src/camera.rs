//! Camera extrinsics and Euler-angle rotations.
//!
//! `look_at` mirrors `gluLookAt`: it builds right-handed world-to-eye
//! matrices for a batch of poses. `roll_pitch_yaw_to_rotation_matrices`
//! converts batches of Euler angles of any leading shape into 3×3 rotation
//! matrices.

use crate::alloc_prelude::Vec;
use crate::array::FloatArray;
use crate::error::{CameraError, Degeneracy};
use crate::types::{Mat3, Mat4, Vec3};

/// Norm below which a derived camera vector is considered degenerate.
pub const VECTOR_DEGENERACY_CUTOFF: f32 = 1e-6;

/// Build world-to-eye extrinsic matrices for a batch of cameras.
///
/// For each row: `forward = normalize(center - eye)`,
/// `to_side = normalize(forward × world_up)`, `cam_up = to_side × forward`.
/// The rotation rows are `[to_side; cam_up; -forward]` and the translation
/// moves `eye` to the origin, so the result is `R · [I | -eye]`.
///
/// All rows are validated before any matrix is built. A single degenerate
/// row fails the whole batch.
///
/// # Errors
/// - `BatchSizeMismatch` if the three slices differ in length.
/// - `DegenerateCamera` for the first row where `|center - eye|` or
///   `|forward × world_up|` is below [`VECTOR_DEGENERACY_CUTOFF`].
pub fn look_at(eye: &[Vec3], center: &[Vec3], world_up: &[Vec3]) -> Result<Vec<Mat4>, CameraError> {
    if eye.len() != center.len() || eye.len() != world_up.len() {
        return Err(CameraError::BatchSizeMismatch {
            eye: eye.len(),
            center: center.len(),
            world_up: world_up.len(),
        });
    }

    let mut bases = Vec::with_capacity(eye.len());
    for (row, ((&eye, &center), &up)) in eye.iter().zip(center).zip(world_up).enumerate() {
        bases.push(camera_basis(row, eye, center, up)?);
    }

    Ok(bases
        .into_iter()
        .zip(eye)
        .map(|(rotation, &eye)| {
            // R · [I | -eye] = [R | -R·eye]
            Mat4::from_rotation_translation(rotation, -rotation.mul_vec(eye))
        })
        .collect())
}

/// Single-camera form of [`look_at`].
pub fn look_at_single(eye: Vec3, center: Vec3, world_up: Vec3) -> Result<Mat4, CameraError> {
    let rotation = camera_basis(0, eye, center, world_up)?;
    Ok(Mat4::from_rotation_translation(
        rotation,
        -rotation.mul_vec(eye),
    ))
}

/// Recover the eye position from a world-to-eye extrinsic matrix.
///
/// For `[R | t]` the camera sits at `-Rᵀ t`.
pub fn camera_position(extrinsic: &Mat4) -> Vec3 {
    -extrinsic.rotation().transpose().mul_vec(extrinsic.translation())
}

/// Validate one pose and return its rotation rows `[to_side; cam_up; -forward]`.
fn camera_basis(row: usize, eye: Vec3, center: Vec3, world_up: Vec3) -> Result<Mat3, CameraError> {
    let forward = center - eye;
    let forward_norm = forward.length();
    // Negated comparison so NaN inputs are rejected too.
    if !(forward_norm >= VECTOR_DEGENERACY_CUTOFF) {
        return Err(CameraError::DegenerateCamera {
            row,
            kind: Degeneracy::EyeAtCenter,
            norm: forward_norm,
        });
    }
    let forward = forward / forward_norm;

    let to_side = forward.cross(world_up);
    let to_side_norm = to_side.length();
    if !(to_side_norm >= VECTOR_DEGENERACY_CUTOFF) {
        return Err(CameraError::DegenerateCamera {
            row,
            kind: Degeneracy::UpParallelToGaze,
            norm: to_side_norm,
        });
    }
    let to_side = to_side / to_side_norm;
    let cam_up = to_side.cross(forward);

    Ok(Mat3::from_row_vectors(to_side, cam_up, -forward))
}

/// Rotation for one `[roll, pitch, yaw]` triple, in radians.
///
/// Applies roll about x, then pitch about y, then yaw about z, so the result
/// equals `Rz(yaw) · Ry(pitch) · Rx(roll)`. Entries are expanded in closed
/// form from the sines and cosines.
pub fn rotation_from_roll_pitch_yaw(roll_pitch_yaw: [f32; 3]) -> Mat3 {
    let [roll, pitch, yaw] = roll_pitch_yaw;
    let (sx, cx) = (libm::sinf(roll), libm::cosf(roll));
    let (sy, cy) = (libm::sinf(pitch), libm::cosf(pitch));
    let (sz, cz) = (libm::sinf(yaw), libm::cosf(yaw));

    Mat3::from_rows([
        [cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx],
        [sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx],
        [-sy, cy * sx, cy * cx],
    ])
}

/// Convert a batch of roll-pitch-yaw triples to rotation matrices.
///
/// Input shape `[..., 3]`, output shape `[..., 3, 3]`; leading dimensions
/// are preserved and each output slice equals
/// [`rotation_from_roll_pitch_yaw`] for the matching triple.
///
/// # Errors
/// Returns `InvalidAngleShape` if the input is rank-0 or its last axis is
/// not 3.
pub fn roll_pitch_yaw_to_rotation_matrices(angles: &FloatArray) -> Result<FloatArray, CameraError> {
    if angles.shape().last() != Some(&3) {
        return Err(CameraError::InvalidAngleShape {
            shape: angles.shape().to_vec(),
        });
    }

    let mut data = Vec::with_capacity(angles.len() * 3);
    for triple in angles.as_slice().chunks_exact(3) {
        let rotation = rotation_from_roll_pitch_yaw([triple[0], triple[1], triple[2]]);
        data.extend_from_slice(&rotation.to_flat());
    }

    let mut shape = angles.shape().to_vec();
    shape.push(3);
    FloatArray::new(shape, data).map_err(|_| CameraError::InvalidAngleShape {
        shape: angles.shape().to_vec(),
    })
}
