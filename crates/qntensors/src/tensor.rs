//! Dense n-dimensional tensor type.
//!
//! `DenseTensor` is the buffer type handled by the dense engine: a shape
//! plus a row-major `Vec` of elements. The block-sparse layer stores one of
//! these per occupied block and otherwise treats it as opaque, going
//! through the operations in [`crate::operations`].

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, compute_strides};

/// A dense n-dimensional tensor with row-major element order.
///
/// A rank-0 tensor holds a single scalar element.
///
/// # Examples
///
/// ```
/// use qntensors::DenseTensor;
///
/// let mut t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
/// t.set(&[0, 1], 5.0).unwrap();
/// assert_eq!(t.get(&[0, 1]), Some(&5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTensor<T: Scalar> {
    data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<T: Scalar> DenseTensor<T> {
    /// Create a new tensor with the given shape, zero-initialized.
    pub fn zeros(shape: &[usize]) -> Self {
        let strides = compute_strides(shape);
        let len: usize = shape.iter().product();
        Self {
            // At least 1 for scalar (empty shape)
            data: vec![T::zero(); len.max(1)],
            shape: shape.to_vec(),
            strides,
        }
    }

    /// Create a tensor filled with ones.
    pub fn ones(shape: &[usize]) -> Self {
        let mut t = Self::zeros(shape);
        t.fill(T::one());
        t
    }

    /// Create a tensor from data and shape.
    ///
    /// Data is expected in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the data length doesn't
    /// match the shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected_len: usize = shape.iter().product::<usize>().max(1);
        if data.len() != expected_len {
            return Err(TensorError::ShapeMismatch {
                expected: expected_len,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        })
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the row-major strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Get the underlying data as a slice.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get the underlying data as a mutable slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get an element by linear index.
    #[inline]
    pub fn get_linear(&self, i: usize) -> Option<&T> {
        self.data.get(i)
    }

    /// Get an element by cartesian indices.
    ///
    /// Returns `None` for out-of-bounds indices or a wrong index count.
    pub fn get(&self, indices: &[usize]) -> Option<&T> {
        if !self.in_bounds(indices) {
            return None;
        }
        self.data.get(cartesian_to_linear(indices, &self.strides))
    }

    /// Set an element by cartesian indices.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` for out-of-bounds indices or a wrong index
    /// count.
    pub fn set(&mut self, indices: &[usize], value: T) -> Result<(), TensorError> {
        if !self.in_bounds(indices) {
            return Err(TensorError::ShapeMismatch {
                expected: self.ndim(),
                actual: indices.len(),
            });
        }
        let linear = cartesian_to_linear(indices, &self.strides);
        self.data[linear] = value;
        Ok(())
    }

    /// Fill all elements with a value.
    pub fn fill(&mut self, value: T) {
        for x in &mut self.data {
            *x = value;
        }
    }

    /// Permute the dimensions of the tensor.
    ///
    /// Delegates to [`crate::operations::permutedims`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermutation` if `perm` is not a permutation of
    /// `0..ndim`.
    pub fn permutedims(&self, perm: &[usize]) -> Result<Self, TensorError> {
        crate::operations::permutedims(self, perm)
    }

    fn in_bounds(&self, indices: &[usize]) -> bool {
        indices.len() == self.ndim()
            && indices.iter().zip(self.shape.iter()).all(|(&i, &d)| i < d)
    }
}

impl<T: Scalar> std::fmt::Display for DenseTensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DenseTensor(shape={:?}, len={})", self.shape, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    #[test]
    fn test_zeros() {
        let t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.ndim(), 2);
        assert_eq!(t.len(), 6);
        assert_eq!(t.strides(), &[3, 1]);
        assert!(t.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_vec_row_major() {
        let t = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.get(&[0, 0]), Some(&1.0));
        assert_eq!(t.get(&[0, 1]), Some(&2.0));
        assert_eq!(t.get(&[0, 2]), Some(&3.0));
        assert_eq!(t.get(&[1, 0]), Some(&4.0));
        assert_eq!(t.get(&[1, 2]), Some(&6.0));
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        let result = DenseTensor::<f64>::from_vec(vec![1.0, 2.0, 3.0], &[2, 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        assert_eq!(t.get(&[2, 0]), None);
        assert_eq!(t.get(&[0, 3]), None);
        assert_eq!(t.get(&[0]), None);
        assert_eq!(t.get(&[0, 0, 0]), None);
    }

    #[test]
    fn test_set_and_fill() {
        let mut t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        t.set(&[1, 2], 42.0).unwrap();
        assert_eq!(t.get(&[1, 2]), Some(&42.0));
        assert!(t.set(&[2, 0], 1.0).is_err());

        t.fill(5.0);
        assert!(t.data().iter().all(|&x| x == 5.0));
    }

    #[test]
    fn test_scalar_tensor() {
        let t: DenseTensor<f64> = DenseTensor::zeros(&[]);
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&[]), Some(&0.0));
    }

    #[test]
    fn test_ones_complex() {
        let t: DenseTensor<c64> = DenseTensor::ones(&[3]);
        assert!(t.data().iter().all(|&x| x == c64::new(1.0, 0.0)));
    }
}
