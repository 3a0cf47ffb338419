//! Block-sparse tensor contraction.
//!
//! The contraction `r = s · t` multiplies the trailing `ndim_mult` axes of
//! `s` against the leading `ndim_mult` axes of `t`. At the block level this
//! is the generalization of block matrix multiplication: each occupied
//! result block accumulates the dense products of every label-conserving
//! pair of `s`/`t` blocks sharing its free coordinates.

use crate::error::TensorError;
use crate::operations::dot_update;
use crate::qnum::{AxisDirection, QNum};
use crate::scalar::Scalar;
use crate::strides::next_index;

use super::tensor::{BlockIndex, BlockSparseTensor};

impl<T: Scalar> BlockSparseTensor<T> {
    /// Contract the last `ndim_mult` axes of `self` against the first
    /// `ndim_mult` axes of `other`.
    ///
    /// Each paired axis must have the same logical extent and block count,
    /// exactly opposite direction, and identical per-position labels
    /// (positional correspondence, not just set equality). The result's
    /// axes are the leading axes of `self` followed by the trailing axes
    /// of `other`; contracting all axes of both operands yields a rank-0
    /// scalar tensor.
    ///
    /// # Errors
    ///
    /// `AxisMismatch` when the precondition fails (including `ndim_mult`
    /// of zero or exceeding either rank); `StructuralInvariant` when a
    /// block guaranteed by the layout is missing, indicating a malformed
    /// operand.
    ///
    /// # Example
    ///
    /// ```
    /// use qntensors::{AxisDirection, BlockSparseTensor};
    ///
    /// let qnums = [0, 1];
    /// let mut s: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
    ///     &[2, 2],
    ///     &[AxisDirection::Out, AxisDirection::In],
    ///     &[&qnums, &qnums],
    /// )
    /// .unwrap();
    /// let mut t = s.clone();
    /// for block in s.occupied_blocks_mut() {
    ///     block.fill(2.0);
    /// }
    /// for block in t.occupied_blocks_mut() {
    ///     block.fill(3.0);
    /// }
    ///
    /// let r = s.dot(&t, 1).unwrap();
    /// assert_eq!(r.shape(), &[2, 2]);
    /// assert_eq!(r.get_block(&[0, 0]).unwrap().data(), &[6.0]);
    /// ```
    pub fn dot(&self, other: &Self, ndim_mult: usize) -> Result<Self, TensorError> {
        let s = self;
        let t = other;

        if ndim_mult == 0 || ndim_mult > s.ndim() || ndim_mult > t.ndim() {
            return Err(TensorError::AxisMismatch {
                reason: format!(
                    "cannot contract {ndim_mult} axes of rank-{} and rank-{} tensors",
                    s.ndim(),
                    t.ndim()
                ),
            });
        }

        let offset = s.ndim() - ndim_mult;
        for i in 0..ndim_mult {
            let sa = offset + i;
            if s.shape()[sa] != t.shape()[i] {
                return Err(TensorError::AxisMismatch {
                    reason: format!(
                        "pair {i}: extents {} and {} differ",
                        s.shape()[sa],
                        t.shape()[i]
                    ),
                });
            }
            if s.block_counts()[sa] != t.block_counts()[i] {
                return Err(TensorError::AxisMismatch {
                    reason: format!(
                        "pair {i}: block counts {} and {} differ",
                        s.block_counts()[sa],
                        t.block_counts()[i]
                    ),
                });
            }
            if s.axis_directions()[sa] != t.axis_directions()[i].reverse() {
                return Err(TensorError::AxisMismatch {
                    reason: format!("pair {i}: axis directions are not opposite"),
                });
            }
            if s.logical_qnums(sa) != t.logical_qnums(i) {
                return Err(TensorError::AxisMismatch {
                    reason: format!("pair {i}: per-position labels differ"),
                });
            }
            // Identical logical labels partition identically.
            debug_assert_eq!(s.block_qnums(sa), t.block_qnums(i));
        }

        let mut r_dim: Vec<usize> = s.shape()[..offset].to_vec();
        r_dim.extend_from_slice(&t.shape()[ndim_mult..]);

        let mut r_dir: Vec<AxisDirection> = s.axis_directions()[..offset].to_vec();
        r_dir.extend_from_slice(&t.axis_directions()[ndim_mult..]);

        let mut r_qnums: Vec<&[QNum]> = (0..offset).map(|i| s.logical_qnums(i)).collect();
        r_qnums.extend((ndim_mult..t.ndim()).map(|i| t.logical_qnums(i)));

        let mut r = Self::zeros(&r_dim, &r_dir, &r_qnums)?;

        let contract_counts: Vec<usize> = t.block_counts()[..ndim_mult].to_vec();
        let ncontract: usize = contract_counts.iter().product();

        for r_index in r.occupied_block_indices() {
            let mut index_contract = vec![0usize; ndim_mult];
            for _ in 0..ncontract {
                let mut index_s: BlockIndex = r_index[..offset].iter().copied().collect();
                index_s.extend(index_contract.iter().copied());

                // The contracted coordinate ranges over all values; only
                // the combinations conserving on the `s` side correspond
                // to occupied blocks.
                if s.is_conserved(&index_s) {
                    let mut index_t: BlockIndex = index_contract.iter().copied().collect();
                    index_t.extend(r_index[offset..].iter().copied());

                    let bs = s.block_at(&index_s).ok_or_else(|| {
                        TensorError::StructuralInvariant {
                            reason: format!("conserved block {index_s:?} is not occupied"),
                        }
                    })?;
                    // Occupied by construction: the pairing precondition
                    // makes the `t` label sum vanish whenever the `s` and
                    // result sums do.
                    let bt = t.block_at(&index_t).ok_or_else(|| {
                        TensorError::StructuralInvariant {
                            reason: format!("derived block {index_t:?} is not occupied"),
                        }
                    })?;
                    let br = r.block_at_mut(&r_index).ok_or_else(|| {
                        TensorError::StructuralInvariant {
                            reason: format!("result block {r_index:?} is not occupied"),
                        }
                    })?;

                    dot_update(T::one(), bs, bt, ndim_mult, T::one(), br)?;
                }

                next_index(&contract_counts, &mut index_contract);
            }
        }

        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::dot;
    use crate::qnum::AxisDirection::{In, Out};
    use approx::assert_relative_eq;

    fn sequential_fill(t: &mut BlockSparseTensor<f64>, start: f64) {
        let mut value = start;
        for block in t.occupied_blocks_mut() {
            for x in block.data_mut() {
                *x = value;
                value += 1.0;
            }
        }
    }

    fn assert_dense_agree(a: &crate::tensor::DenseTensor<f64>, b: &crate::tensor::DenseTensor<f64>) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.data().iter().zip(b.data().iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dot_matches_dense_reference() {
        let qc = [1, 0, 1, -1];
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 4], &[Out, Out], &[&[0, 1, -1], &qc]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[4, 3], &[In, In], &[&qc, &[0, -1, 1]]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 0.5);

        let r = s.dot(&t, 1).unwrap();
        assert_eq!(r.shape(), &[3, 3]);

        let reference = dot(&s.to_dense(), &t.to_dense(), 1).unwrap();
        assert_dense_agree(&r.to_dense(), &reference);
    }

    #[test]
    fn test_dot_two_axes_matches_dense_reference() {
        let q0 = [0, 1];
        let q1 = [1, -1, 0];
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2, 3], &[Out, Out, In], &[&q0, &q0, &q1]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 3, 2], &[In, Out, Out], &[&q0, &q1, &[0, 0]]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 2.0);

        let r = s.dot(&t, 2).unwrap();
        assert_eq!(r.shape(), &[2, 2]);

        let reference = dot(&s.to_dense(), &t.to_dense(), 2).unwrap();
        assert_dense_agree(&r.to_dense(), &reference);
    }

    #[test]
    fn test_dot_full_contraction_scalar() {
        let qnums = [0, 1, -1];
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3], &[Out], &[&qnums]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3], &[In], &[&qnums]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 4.0);

        let r = s.dot(&t, 1).unwrap();
        assert_eq!(r.ndim(), 0);

        let reference = dot(&s.to_dense(), &t.to_dense(), 1).unwrap();
        assert_relative_eq!(
            *r.get_block(&[]).unwrap().get_linear(0).unwrap(),
            *reference.get_linear(0).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dot_result_conserves() {
        let q0 = [0, 1, 1];
        let q1 = [1, 0, -1];
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 3], &[Out, Out], &[&q0, &q1]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 3], &[In, Out], &[&q1, &q0]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 1.0);

        let r = s.dot(&t, 1).unwrap();
        for (index, _) in r.occupied_blocks() {
            assert!(r.is_conserved(&index));
        }
    }

    #[test]
    fn test_dot_label_mismatch() {
        // Same label multiset on the paired axis, different positions:
        // positional correspondence is required.
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 3], &[Out, Out], &[&[0, 1], &[1, 0, 0]]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 4], &[In, Out], &[&[0, 1, 0], &[0, 1, -1, 0]]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 1.0);

        let result = s.dot(&t, 1);
        assert!(matches!(result, Err(TensorError::AxisMismatch { .. })));
    }

    #[test]
    fn test_dot_direction_mismatch() {
        let qnums = [0, 1];
        let s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, Out], &[&qnums, &qnums]).unwrap();
        let t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, In], &[&qnums, &qnums]).unwrap();

        // Paired axis directions are Out/Out, not opposite.
        assert!(matches!(
            s.dot(&t, 1),
            Err(TensorError::AxisMismatch { .. })
        ));
    }

    #[test]
    fn test_dot_extent_mismatch() {
        let s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, Out], &[&[0, 1], &[0, 1]]).unwrap();
        let t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 2], &[In, Out], &[&[0, 1, 2], &[0, 1]]).unwrap();

        assert!(matches!(
            s.dot(&t, 1),
            Err(TensorError::AxisMismatch { .. })
        ));
    }

    #[test]
    fn test_dot_invalid_axis_count() {
        let qnums = [0, 1];
        let s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, Out], &[&qnums, &qnums]).unwrap();
        let t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[In, In], &[&qnums, &qnums]).unwrap();

        assert!(s.dot(&t, 0).is_err());
        assert!(s.dot(&t, 3).is_err());
    }

    #[test]
    fn test_dot_accumulates_over_contracted_blocks() {
        // Full contraction over two axes: the contracted block coordinate
        // ranges over (0,0) and (1,1), so two block pairs accumulate into
        // the single scalar result block.
        let qnums = [0, 1, 1];
        let mut s: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 3], &[Out, In], &[&qnums, &qnums]).unwrap();
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 3], &[In, Out], &[&qnums, &qnums]).unwrap();
        sequential_fill(&mut s, 1.0);
        sequential_fill(&mut t, 1.0);
        assert_eq!(s.num_occupied_blocks(), 2);

        let r = s.dot(&t, 2).unwrap();
        assert_eq!(r.ndim(), 0);

        let reference = dot(&s.to_dense(), &t.to_dense(), 2).unwrap();
        assert_relative_eq!(
            *r.get_block(&[]).unwrap().get_linear(0).unwrap(),
            *reference.get_linear(0).unwrap(),
            epsilon = 1e-12
        );
    }
}
