//! Accumulating tensor dot product, backed by faer's matrix multiply.
//!
//! `dot_update` contracts the trailing `ndim_mult` axes of `a` with the
//! leading `ndim_mult` axes of `b`. With row-major buffers this is a single
//! GEMM: the leading axes of `a` flatten to rows, the trailing axes of `b`
//! flatten to columns, and the contracted axes flatten to the shared inner
//! dimension. faer matrices are column-major, so the row-major buffers are
//! handed over as transposed views and the product is computed as
//! Cᵀ = Bᵀ · Aᵀ, zero-copy.

use faer::linalg::matmul::matmul;
use faer::{Accum, MatMut, MatRef, Par};

use crate::error::TensorError;
use crate::operations::scale_inplace;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Contract the trailing `ndim_mult` axes of `a` with the leading
/// `ndim_mult` axes of `b`, returning a new tensor.
///
/// The result shape is the leading axes of `a` followed by the trailing
/// axes of `b`.
///
/// # Errors
///
/// Returns `ShapeMismatch` if `ndim_mult` exceeds either rank or the
/// contracted extents disagree.
///
/// # Example
///
/// ```
/// use qntensors::DenseTensor;
/// use qntensors::operations::dot;
///
/// // Matrix product: C[i,k] = sum_j A[i,j] * B[j,k]
/// let a = DenseTensor::<f64>::ones(&[2, 3]);
/// let b = DenseTensor::<f64>::ones(&[3, 4]);
/// let c = dot(&a, &b, 1).unwrap();
/// assert_eq!(c.shape(), &[2, 4]);
/// assert_eq!(c.get(&[0, 0]), Some(&3.0));
/// ```
pub fn dot<T: Scalar>(
    a: &DenseTensor<T>,
    b: &DenseTensor<T>,
    ndim_mult: usize,
) -> Result<DenseTensor<T>, TensorError> {
    if ndim_mult > a.ndim() || ndim_mult > b.ndim() {
        return Err(TensorError::ShapeMismatch {
            expected: ndim_mult,
            actual: a.ndim().min(b.ndim()),
        });
    }

    let mut shape: Vec<usize> = a.shape()[..a.ndim() - ndim_mult].to_vec();
    shape.extend_from_slice(&b.shape()[ndim_mult..]);

    let mut c = DenseTensor::zeros(&shape);
    dot_update(T::one(), a, b, ndim_mult, T::zero(), &mut c)?;
    Ok(c)
}

/// Accumulating contraction: `c = alpha * (a · b) + beta * c`.
///
/// Contracts the trailing `ndim_mult` axes of `a` with the leading
/// `ndim_mult` axes of `b`; `c` must have the shape of `a`'s leading axes
/// followed by `b`'s trailing axes.
///
/// # Errors
///
/// Returns `ShapeMismatch` if `ndim_mult` exceeds either rank or any of the
/// flattened matrix dimensions disagree.
pub fn dot_update<T: Scalar>(
    alpha: T,
    a: &DenseTensor<T>,
    b: &DenseTensor<T>,
    ndim_mult: usize,
    beta: T,
    c: &mut DenseTensor<T>,
) -> Result<(), TensorError> {
    if ndim_mult > a.ndim() || ndim_mult > b.ndim() {
        return Err(TensorError::ShapeMismatch {
            expected: ndim_mult,
            actual: a.ndim().min(b.ndim()),
        });
    }

    let split_a = a.ndim() - ndim_mult;
    let m: usize = a.shape()[..split_a].iter().product();
    let k: usize = a.shape()[split_a..].iter().product();
    let k_b: usize = b.shape()[..ndim_mult].iter().product();
    let n: usize = b.shape()[ndim_mult..].iter().product();

    if k != k_b {
        return Err(TensorError::ShapeMismatch {
            expected: k,
            actual: k_b,
        });
    }
    if c.len() != m * n {
        return Err(TensorError::ShapeMismatch {
            expected: m * n,
            actual: c.len(),
        });
    }

    let accum = if beta == T::zero() {
        Accum::Replace
    } else {
        if beta != T::one() {
            scale_inplace(c, beta);
        }
        Accum::Add
    };

    // Row-major X of shape (r, c) reads as the column-major matrix Xᵀ.
    let b_t = MatRef::from_column_major_slice(b.data(), n, k);
    let a_t = MatRef::from_column_major_slice(a.data(), k, m);
    let c_t = MatMut::from_column_major_slice_mut(c.data_mut(), n, m);

    matmul(c_t, accum, b_t, a_t, alpha, Par::Seq);
    Ok(())
}
