//! Owned, shaped f32 buffers.
//!
//! Every numeric field of a shape example and every batched camera input is
//! a dense row-major array of f32. [`FloatArray`] keeps the buffer and its
//! shape together and refuses any construction where the two disagree.

use crate::alloc_prelude::{vec, Vec};
use crate::error::ArrayError;

/// Dense row-major f32 array with an explicit shape.
///
/// The product of `shape` always equals `data.len()`. A rank-0 array
/// (empty shape) holds exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatArray {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl FloatArray {
    /// Wrap `data` with `shape`.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `data.len()` is not the product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, ArrayError> {
        if element_count(&shape) != data.len() {
            return Err(ArrayError::LengthMismatch {
                len: data.len(),
                shape,
            });
        }
        Ok(Self { shape, data })
    }

    /// Array of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; element_count(shape)],
        }
    }

    /// Array whose value at flat index `i` is `f(i)`.
    pub fn from_fn(shape: &[usize], f: impl FnMut(usize) -> f32) -> Self {
        Self {
            shape: shape.to_vec(),
            data: (0..element_count(shape)).map(f).collect(),
        }
    }

    /// The shape.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no values (some axis has size 0).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns true if the shape equals `expected` exactly.
    #[inline]
    pub fn has_shape(&self, expected: &[usize]) -> bool {
        self.shape == expected
    }

    /// Slice along the leading axis: the values of sub-array `index`.
    ///
    /// Returns `None` for rank-0 arrays or an out-of-range index.
    pub fn outer(&self, index: usize) -> Option<&[f32]> {
        let (&outer, inner) = self.shape.split_first()?;
        if index >= outer {
            return None;
        }
        let stride = element_count(inner);
        Some(&self.data[index * stride..(index + 1) * stride])
    }

    /// Drop a leading axis of size 1 without copying the values.
    ///
    /// # Errors
    /// Returns `LeadingAxisNotSingleton` if the array is rank-0 or the
    /// leading axis is not exactly 1. The array is never reshaped to fit.
    pub fn squeeze_leading(self) -> Result<Self, ArrayError> {
        match self.shape.first() {
            Some(1) => Ok(Self {
                shape: self.shape[1..].to_vec(),
                data: self.data,
            }),
            _ => Err(ArrayError::LeadingAxisNotSingleton { shape: self.shape }),
        }
    }

    /// Add a leading axis of size 1.
    pub fn unsqueeze_leading(mut self) -> Self {
        self.shape.insert(0, 1);
        self
    }
}

/// Number of values described by `shape`.
#[inline]
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = FloatArray::new(vec![2, 3], vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            ArrayError::LengthMismatch {
                shape: vec![2, 3],
                len: 5
            }
        );
    }

    #[test]
    fn test_rank_zero_holds_one_value() {
        let a = FloatArray::new(vec![], vec![7.0]).unwrap();
        assert_eq!(a.rank(), 0);
        assert_eq!(a.len(), 1);
        assert!(a.outer(0).is_none());
    }

    #[test]
    fn test_outer_slices() {
        let a = FloatArray::from_fn(&[3, 2], |i| i as f32);
        assert_eq!(a.outer(1), Some(&[2.0, 3.0][..]));
        assert!(a.outer(3).is_none());
    }

    #[test]
    fn test_squeeze_leading() {
        let a = FloatArray::from_fn(&[1, 4, 2], |i| i as f32);
        let squeezed = a.clone().squeeze_leading().unwrap();
        assert_eq!(squeezed.shape(), &[4, 2]);
        assert_eq!(squeezed.as_slice(), a.as_slice());
        assert_eq!(squeezed.unsqueeze_leading(), a);
    }

    #[test]
    fn test_squeeze_rejects_non_singleton() {
        let a = FloatArray::zeros(&[2, 4]);
        assert_eq!(
            a.squeeze_leading(),
            Err(ArrayError::LeadingAxisNotSingleton { shape: vec![2, 4] })
        );
        assert!(FloatArray::zeros(&[]).squeeze_leading().is_err());
    }
}
