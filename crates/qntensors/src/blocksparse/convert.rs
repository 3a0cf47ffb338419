//! Conversion between block-sparse and dense representations.
//!
//! Both directions walk every occupied block and translate its block-local
//! coordinates to logical coordinates through per-axis fan-out maps: the
//! ordered logical positions carrying the block's label. Entries of a dense
//! source that fall outside the sparsity pattern are never read, so the
//! dense → block-sparse direction is a lossy projection onto the conserved
//! subspace.

use crate::error::TensorError;
use crate::qnum::{AxisDirection, QNum, positions_with_qnum};
use crate::scalar::Scalar;
use crate::strides::next_index;
use crate::tensor::DenseTensor;

use super::tensor::BlockSparseTensor;

impl<T: Scalar> BlockSparseTensor<T> {
    /// Convert to the equivalent dense tensor.
    ///
    /// Occupied blocks are scattered to their logical positions; everything
    /// else is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use qntensors::{AxisDirection, BlockSparseTensor};
    ///
    /// let qnums = [0, 1];
    /// let mut t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
    ///     &[2, 2],
    ///     &[AxisDirection::Out, AxisDirection::In],
    ///     &[&qnums, &qnums],
    /// )
    /// .unwrap();
    /// t.get_block_mut(&[1, 1]).unwrap().fill(5.0);
    ///
    /// let dense = t.to_dense();
    /// assert_eq!(dense.get(&[1, 1]), Some(&5.0));
    /// assert_eq!(dense.get(&[0, 1]), Some(&0.0));
    /// ```
    pub fn to_dense(&self) -> DenseTensor<T> {
        let ndim = self.ndim();
        let mut dense = DenseTensor::zeros(self.shape());
        let dense_strides = dense.strides().to_vec();

        for (block_index, block) in self.occupied_blocks() {
            let index_map = self.fan_out_maps(&block_index);

            let mut local = vec![0usize; ndim];
            for j in 0..block.len() {
                let offset: usize = (0..ndim)
                    .map(|i| index_map[i][local[i]] * dense_strides[i])
                    .sum();
                dense.data_mut()[offset] = block.data()[j];
                next_index(block.shape(), &mut local);
            }
        }

        dense
    }

    /// Build a block-sparse tensor from a dense one, using the sparsity
    /// pattern imposed by the provided labels.
    ///
    /// Dense entries whose composed label sum is nonzero are silently
    /// dropped; this is a defined lossy projection, not an error.
    ///
    /// # Errors
    ///
    /// Same as [`BlockSparseTensor::zeros`] for the derived layout.
    pub fn from_dense(
        dense: &DenseTensor<T>,
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
    ) -> Result<Self, TensorError> {
        let mut t = Self::zeros(dense.shape(), axis_dir, qnums)?;
        let ndim = t.ndim();
        let dense_strides = dense.strides().to_vec();

        for block_index in t.occupied_block_indices() {
            let index_map = t.fan_out_maps(&block_index);

            if let Some(block) = t.block_at_mut(&block_index) {
                let block_shape = block.shape().to_vec();
                let mut local = vec![0usize; ndim];
                for j in 0..block.len() {
                    let offset: usize = (0..ndim)
                        .map(|i| index_map[i][local[i]] * dense_strides[i])
                        .sum();
                    block.data_mut()[j] = dense.data()[offset];
                    next_index(&block_shape, &mut local);
                }
            }
        }

        Ok(t)
    }

    /// Per-axis local → logical coordinate maps for the block at
    /// `block_index`.
    fn fan_out_maps(&self, block_index: &[usize]) -> Vec<Vec<usize>> {
        (0..self.ndim())
            .map(|i| {
                positions_with_qnum(
                    self.logical_qnums(i),
                    self.block_qnums(i)[block_index[i]],
                )
            })
            .collect()
    }
}
