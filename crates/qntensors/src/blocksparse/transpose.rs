//! Generalized transpose of block-sparse tensors.

use crate::error::TensorError;
use crate::operations::{permutedims, validate_permutation};
use crate::qnum::{AxisDirection, QNum};
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

use super::tensor::{BlockIndex, BlockSparseTensor};

impl<T: Scalar> BlockSparseTensor<T> {
    /// Generalized transpose: axis `i` of the result is axis `perm[i]` of
    /// the input.
    ///
    /// All per-axis metadata moves with the axes; every occupied block is
    /// relocated to its permuted block coordinate and its data permuted by
    /// the dense engine. Rank 0 is a scalar value copy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermutation` if `perm` is not a permutation of
    /// `0..rank`.
    ///
    /// # Example
    ///
    /// ```
    /// use qntensors::{AxisDirection, BlockSparseTensor};
    ///
    /// let t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
    ///     &[2, 3],
    ///     &[AxisDirection::Out, AxisDirection::In],
    ///     &[&[0, 1], &[0, 1, 1]],
    /// )
    /// .unwrap();
    ///
    /// let r = t.transpose(&[1, 0]).unwrap();
    /// assert_eq!(r.shape(), &[3, 2]);
    /// assert_eq!(r.logical_qnums(0), &[0, 1, 1]);
    /// ```
    pub fn transpose(&self, perm: &[usize]) -> Result<Self, TensorError> {
        validate_permutation(perm, self.ndim())?;

        if self.ndim() == 0 {
            return Ok(self.clone());
        }

        let dim_logical: Vec<usize> = perm.iter().map(|&p| self.shape()[p]).collect();
        let dim_blocks: Vec<usize> = perm.iter().map(|&p| self.block_counts()[p]).collect();
        let axis_dir: Vec<AxisDirection> =
            perm.iter().map(|&p| self.axis_directions()[p]).collect();
        let qnums_logical: Vec<Vec<QNum>> =
            perm.iter().map(|&p| self.logical_qnums(p).to_vec()).collect();
        let qnums_blocks: Vec<Vec<QNum>> =
            perm.iter().map(|&p| self.block_qnums(p).to_vec()).collect();

        let nblocks: usize = dim_blocks.iter().product();
        let mut blocks: Vec<Option<DenseTensor<T>>> = vec![None; nblocks];

        for (index, block) in self.occupied_blocks() {
            let dest_index: BlockIndex = perm.iter().map(|&p| index[p]).collect();
            let linear = dest_index
                .iter()
                .zip(dim_blocks.iter())
                .fold(0, |l, (&b, &n)| l * n + b);
            blocks[linear] = Some(permutedims(block, perm)?);
        }

        Ok(Self::from_parts(
            dim_logical,
            dim_blocks,
            axis_dir,
            qnums_logical,
            qnums_blocks,
            blocks,
        ))
    }

    /// Transpose followed by elementwise conjugation of the result.
    pub fn conj_transpose(&self, perm: &[usize]) -> Result<Self, TensorError> {
        let mut r = self.transpose(perm)?;
        r.conj();
        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qnum::AxisDirection::{In, Out};
    use crate::scalar::c64;

    fn sequential_fill(t: &mut BlockSparseTensor<f64>) {
        let mut value = 1.0;
        for block in t.occupied_blocks_mut() {
            for x in block.data_mut() {
                *x = value;
                value += 1.0;
            }
        }
    }

    #[test]
    fn test_transpose_metadata() {
        let t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
            &[4, 3, 2],
            &[Out, In, Out],
            &[&[0, 1, 1, 2], &[0, 1, 2], &[0, 1]],
        )
        .unwrap();

        let r = t.transpose(&[2, 0, 1]).unwrap();
        assert_eq!(r.shape(), &[2, 4, 3]);
        assert_eq!(r.axis_directions(), &[Out, Out, In]);
        assert_eq!(r.logical_qnums(1), &[0, 1, 1, 2]);
        assert_eq!(r.block_counts(), &[2, 3, 3]);
        assert_eq!(r.num_occupied_blocks(), t.num_occupied_blocks());
    }

    #[test]
    fn test_transpose_matches_dense() {
        let mut t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
            &[3, 3, 2],
            &[Out, In, Out],
            &[&[1, 0, 1], &[0, 1, 1], &[0, -1]],
        )
        .unwrap();
        sequential_fill(&mut t);

        let perm = [2, 0, 1];
        let r = t.transpose(&perm).unwrap();

        let dense = t.to_dense();
        let dense_perm = permutedims(&dense, &perm).unwrap();
        assert_eq!(r.to_dense(), dense_perm);
    }

    #[test]
    fn test_transpose_involution() {
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 2, 2], &[Out, In, In], &[&[1, 0, 1], &[0, 1], &[1, 0]])
                .unwrap();
        sequential_fill(&mut t);

        let perm = [1, 2, 0];
        let inverse = [2, 0, 1];
        let back = t.transpose(&perm).unwrap().transpose(&inverse).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_transpose_preserves_conservation() {
        let mut t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[3, 3], &[Out, In], &[&[-1, 0, 1], &[-1, 0, 1]]).unwrap();
        sequential_fill(&mut t);

        let r = t.transpose(&[1, 0]).unwrap();
        for (index, _) in r.occupied_blocks() {
            assert!(r.is_conserved(&index));
        }
    }

    #[test]
    fn test_transpose_rank0() {
        let mut t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(&[], &[], &[]).unwrap();
        t.get_block_mut(&[]).unwrap().fill(9.0);

        let r = t.transpose(&[]).unwrap();
        assert_eq!(r.get_block(&[]).unwrap().data(), &[9.0]);
    }

    #[test]
    fn test_transpose_invalid_permutation() {
        let t: BlockSparseTensor<f64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, In], &[&[0, 1], &[0, 1]]).unwrap();

        assert!(t.transpose(&[0]).is_err());
        assert!(t.transpose(&[0, 0]).is_err());
        assert!(t.transpose(&[0, 2]).is_err());
    }

    #[test]
    fn test_conj_transpose() {
        let mut t: BlockSparseTensor<c64> =
            BlockSparseTensor::zeros(&[2, 2], &[Out, In], &[&[0, 1], &[0, 1]]).unwrap();
        for block in t.occupied_blocks_mut() {
            block.fill(c64::new(1.0, 2.0));
        }

        let r = t.conj_transpose(&[1, 0]).unwrap();
        for (_, block) in r.occupied_blocks() {
            assert!(block.data().iter().all(|&x| x == c64::new(1.0, -2.0)));
        }
    }
}
