//! Elementwise dense tensor operations.

use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Multiply all elements by a scalar, returning a new tensor.
///
/// # Example
///
/// ```
/// use qntensors::DenseTensor;
/// use qntensors::operations::scale;
///
/// let t = DenseTensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let ts = scale(&t, 2.0);
/// assert_eq!(ts.data(), &[2.0, 4.0, 6.0]);
/// ```
pub fn scale<T: Scalar>(tensor: &DenseTensor<T>, alpha: T) -> DenseTensor<T> {
    let mut result = tensor.clone();
    scale_inplace(&mut result, alpha);
    result
}

/// Scale a tensor in place.
pub fn scale_inplace<T: Scalar>(tensor: &mut DenseTensor<T>, alpha: T) {
    for x in tensor.data_mut() {
        *x = *x * alpha;
    }
}

/// Return a new tensor with elementwise complex conjugation.
///
/// For real tensors this is a copy.
///
/// # Example
///
/// ```
/// use qntensors::{DenseTensor, c64};
/// use qntensors::operations::conj;
///
/// let t = DenseTensor::from_vec(vec![c64::new(1.0, 2.0), c64::new(3.0, -4.0)], &[2]).unwrap();
/// let tc = conj(&t);
/// assert_eq!(tc.get(&[0]).unwrap().im, -2.0);
/// assert_eq!(tc.get(&[1]).unwrap().im, 4.0);
/// ```
pub fn conj<T: Scalar>(tensor: &DenseTensor<T>) -> DenseTensor<T> {
    let mut result = tensor.clone();
    conj_inplace(&mut result);
    result
}

/// Complex conjugate in place.
pub fn conj_inplace<T: Scalar>(tensor: &mut DenseTensor<T>) {
    for x in tensor.data_mut() {
        *x = x.conjugate();
    }
}
