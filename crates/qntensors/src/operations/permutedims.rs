//! Permutation operations for dense tensors.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, next_index};
use crate::tensor::DenseTensor;

/// Permute the dimensions of a dense tensor, returning a new tensor.
///
/// # Arguments
///
/// * `tensor` - Input tensor
/// * `perm` - Permutation of dimensions. `perm[i]` gives the source
///   dimension for the i-th dimension of the result.
///
/// # Errors
///
/// Returns `InvalidPermutation` if `perm` is not a valid permutation of
/// `0..ndim`.
///
/// # Examples
///
/// ```
/// use qntensors::DenseTensor;
/// use qntensors::operations::permutedims;
///
/// let t = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// let t2 = permutedims(&t, &[1, 0]).unwrap();
/// assert_eq!(t2.shape(), &[3, 2]);
///
/// // t[i,j] == t2[j,i]
/// assert_eq!(t.get(&[1, 0]), t2.get(&[0, 1]));
/// assert_eq!(t.get(&[0, 2]), t2.get(&[2, 0]));
/// ```
pub fn permutedims<T: Scalar>(
    tensor: &DenseTensor<T>,
    perm: &[usize],
) -> Result<DenseTensor<T>, TensorError> {
    validate_permutation(perm, tensor.ndim())?;

    let new_shape: Vec<usize> = perm.iter().map(|&p| tensor.shape()[p]).collect();
    let mut result = DenseTensor::zeros(&new_shape);
    permutedims_into(&mut result, tensor, perm);
    Ok(result)
}

/// Permute dense tensor dimensions into an existing output tensor.
///
/// The caller guarantees that `dest` has the permuted shape of `src` and
/// that `perm` is valid; [`permutedims`] is the checked entry point.
pub fn permutedims_into<T: Scalar>(dest: &mut DenseTensor<T>, src: &DenseTensor<T>, perm: &[usize]) {
    debug_assert_eq!(dest.len(), src.len());

    let ndim = src.ndim();
    let dest_strides = dest.strides().to_vec();
    let mut src_index = vec![0usize; ndim];
    let mut dest_index = vec![0usize; ndim];
    let src_shape = src.shape().to_vec();

    for j in 0..src.len() {
        for i in 0..ndim {
            dest_index[i] = src_index[perm[i]];
        }
        dest.data_mut()[cartesian_to_linear(&dest_index, &dest_strides)] = src.data()[j];
        next_index(&src_shape, &mut src_index);
    }
}

/// Validate that `perm` is a permutation of `0..ndim`.
pub fn validate_permutation(perm: &[usize], ndim: usize) -> Result<(), TensorError> {
    if perm.len() != ndim {
        return Err(TensorError::InvalidPermutation {
            perm: perm.to_vec(),
            ndim,
        });
    }

    let mut seen = vec![false; ndim];
    for &p in perm {
        if p >= ndim || seen[p] {
            return Err(TensorError::InvalidPermutation {
                perm: perm.to_vec(),
                ndim,
            });
        }
        seen[p] = true;
    }

    Ok(())
}
