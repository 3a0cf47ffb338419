//! Flattening two neighboring axes into one.
//!
//! Merging axes changes the internal block structure: a merged block
//! collects every (j, k) label pair summing to its label, typically from
//! several source blocks, so block contents have to be remapped rather
//! than reshaped. Entries after the merge point keep their relative order,
//! which lets the data move as contiguous row-major slices, one per
//! distinct merged coordinate.

use crate::error::TensorError;
use crate::qnum::{AxisDirection, QNum, positions_with_qnum};
use crate::scalar::Scalar;
use crate::strides::next_index;

use super::tensor::{BlockIndex, BlockSparseTensor};

impl<T: Scalar> BlockSparseTensor<T> {
    /// Flatten axes `i_ax` and `i_ax + 1` into a single axis with the
    /// given direction.
    ///
    /// The merged logical label for a position pair `(j, k)` is
    /// `sign(new_dir) * (sign(dir[i_ax]) * q[i_ax][j] + sign(dir[i_ax+1]) * q[i_ax+1][k])`,
    /// which re-expresses the two axes' conservation contribution in terms
    /// of the merged axis, so the selection rule carries over to any later
    /// contraction.
    ///
    /// # Errors
    ///
    /// `AxisOutOfBounds` when `i_ax + 1` is not a valid axis;
    /// `StructuralInvariant` when a derived merged block is missing, which
    /// indicates a malformed input tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use qntensors::{AxisDirection, BlockSparseTensor};
    ///
    /// let t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
    ///     &[2, 2, 3],
    ///     &[AxisDirection::Out, AxisDirection::Out, AxisDirection::In],
    ///     &[&[0, 1], &[0, 1], &[0, 1, 2]],
    /// )
    /// .unwrap();
    ///
    /// let r = t.flatten_axes(0, AxisDirection::Out).unwrap();
    /// assert_eq!(r.shape(), &[4, 3]);
    /// assert_eq!(r.logical_qnums(0), &[0, 1, 1, 2]);
    /// ```
    pub fn flatten_axes(&self, i_ax: usize, new_dir: AxisDirection) -> Result<Self, TensorError> {
        let ndim = self.ndim();
        if i_ax + 1 >= ndim {
            return Err(TensorError::AxisOutOfBounds {
                axis: i_ax + 1,
                ndim,
            });
        }

        let d0 = self.shape()[i_ax];
        let d1 = self.shape()[i_ax + 1];
        let s0 = self.axis_directions()[i_ax].sign();
        let s1 = self.axis_directions()[i_ax + 1].sign();

        // Merged logical labels, position pair (j, k) -> j * d1 + k.
        let mut qnums_flat: Vec<QNum> = Vec::with_capacity(d0 * d1);
        for j in 0..d0 {
            for k in 0..d1 {
                qnums_flat.push(
                    new_dir.sign()
                        * (s0 * self.logical_qnums(i_ax)[j]
                            + s1 * self.logical_qnums(i_ax + 1)[k]),
                );
            }
        }

        let mut r_dim: Vec<usize> = self.shape()[..i_ax].to_vec();
        r_dim.push(d0 * d1);
        r_dim.extend_from_slice(&self.shape()[i_ax + 2..]);

        let mut r_dir: Vec<AxisDirection> = self.axis_directions()[..i_ax].to_vec();
        r_dir.push(new_dir);
        r_dir.extend_from_slice(&self.axis_directions()[i_ax + 2..]);

        let mut r_qnums: Vec<&[QNum]> = (0..i_ax).map(|i| self.logical_qnums(i)).collect();
        r_qnums.push(&qnums_flat);
        r_qnums.extend((i_ax + 2..ndim).map(|i| self.logical_qnums(i)));

        let mut r = Self::zeros(&r_dim, &r_dir, &r_qnums)?;

        for (index, bt) in self.occupied_blocks() {
            let q0 = self.block_qnums(i_ax)[index[i_ax]];
            let q1 = self.block_qnums(i_ax + 1)[index[i_ax + 1]];
            let q_flat = new_dir.sign() * (s0 * q0 + s1 * q1);

            // Destination block coordinate.
            let merged_pos = r
                .block_qnums(i_ax)
                .binary_search(&q_flat)
                .map_err(|_| TensorError::StructuralInvariant {
                    reason: format!("merged axis has no block with label {q_flat}"),
                })?;
            let mut dest_index: BlockIndex = index[..i_ax].iter().copied().collect();
            dest_index.push(merged_pos);
            dest_index.extend(index[i_ax + 2..].iter().copied());

            // Block-local -> logical fan-out for the two source axes,
            // composed with the logical -> block-local fan-in on the
            // merged axis.
            let fanout0 = positions_with_qnum(self.logical_qnums(i_ax), q0);
            let fanout1 = positions_with_qnum(self.logical_qnums(i_ax + 1), q1);
            let mut fanin = vec![0usize; d0 * d1];
            let mut c = 0;
            for (j, &q) in r.logical_qnums(i_ax).iter().enumerate() {
                if q == q_flat {
                    fanin[j] = c;
                    c += 1;
                }
            }

            let b0 = bt.shape()[i_ax];
            let b1 = bt.shape()[i_ax + 1];
            let mut merged_local = vec![0usize; b0 * b1];
            for j0 in 0..b0 {
                for j1 in 0..b1 {
                    merged_local[j0 * b1 + j1] = fanin[fanout0[j0] * d1 + fanout1[j1]];
                }
            }

            // Entries after the merge point move as one contiguous slice
            // per distinct merged coordinate.
            let nslices: usize = bt.shape()[..i_ax + 2].iter().product();
            let stride: usize = bt.shape()[i_ax + 2..].iter().product();

            let br = r
                .block_at_mut(&dest_index)
                .ok_or_else(|| TensorError::StructuralInvariant {
                    reason: format!("derived block {dest_index:?} is not occupied"),
                })?;
            let br_shape = br.shape().to_vec();
            debug_assert_eq!(stride, br_shape[i_ax + 1..].iter().product::<usize>());

            let mut slice_index = vec![0usize; i_ax + 2];
            for j in 0..nslices {
                let mut l = 0;
                for i in 0..i_ax {
                    l = l * br_shape[i] + slice_index[i];
                }
                l = l * br_shape[i_ax]
                    + merged_local[slice_index[i_ax] * b1 + slice_index[i_ax + 1]];

                br.data_mut()[l * stride..(l + 1) * stride]
                    .copy_from_slice(&bt.data()[j * stride..(j + 1) * stride]);
                next_index(&bt.shape()[..i_ax + 2], &mut slice_index);
            }
        }

        Ok(r)
    }
}
