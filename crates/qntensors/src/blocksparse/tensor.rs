//! Block-sparse tensor type: layout construction, lookup, and elementwise
//! value updates.

use smallvec::SmallVec;

use crate::error::TensorError;
use crate::operations::{conj_inplace, scale_inplace};
use crate::qnum::{AxisDirection, QNum, partition_axis};
use crate::scalar::Scalar;
use crate::strides::{linear_to_cartesian, next_index};
use crate::tensor::DenseTensor;

/// Block multi-index: one block coordinate per axis.
///
/// Stack-allocated for the common case of rank <= 8.
pub type BlockIndex = SmallVec<[usize; 8]>;

/// A block-sparse tensor.
///
/// Each axis is partitioned by its quantum number labels into groups of
/// equal label; one potential dense sub-block exists per combination of
/// per-axis label groups, and only the combinations whose
/// direction-weighted label sum vanishes are allocated. All other
/// combinations are exact zeros and stored as `None`.
///
/// A rank-0 tensor is a scalar: it has no axes and exactly one occupied
/// block holding a single element.
///
/// # Example
///
/// ```
/// use qntensors::{AxisDirection, BlockSparseTensor};
///
/// // Two extent-3 axes labeled [-1, 0, 1] with opposite directions:
/// // of the 9 block coordinates only the 3 with matching labels survive.
/// let qnums = [-1, 0, 1];
/// let t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
///     &[3, 3],
///     &[AxisDirection::Out, AxisDirection::In],
///     &[&qnums, &qnums],
/// )
/// .unwrap();
///
/// assert_eq!(t.num_occupied_blocks(), 3);
/// assert_eq!(t.num_blocks_total(), 9);
/// assert!(t.get_block(&[1, 1]).is_some());
/// assert!(t.get_block(&[1, 0]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSparseTensor<T: Scalar> {
    /// Dense-view extent per axis.
    dim_logical: Vec<usize>,
    /// Number of distinct labels per axis.
    dim_blocks: Vec<usize>,
    /// Sign convention per axis.
    axis_dir: Vec<AxisDirection>,
    /// Label per logical position, per axis.
    qnums_logical: Vec<Vec<QNum>>,
    /// Distinct labels per axis, sorted ascending.
    qnums_blocks: Vec<Vec<QNum>>,
    /// Dense blocks, row-major flattened over `dim_blocks`; `None` marks an
    /// exact-zero region.
    blocks: Vec<Option<DenseTensor<T>>>,
}

impl<T: Scalar> BlockSparseTensor<T> {
    /// Allocate a zero-initialized block-sparse tensor.
    ///
    /// Partitions each axis by its labels and allocates a dense block for
    /// every label combination whose direction-weighted sum is zero. With
    /// empty arguments this yields the rank-0 scalar tensor.
    ///
    /// # Errors
    ///
    /// `InvalidShape` for a zero extent; `ShapeMismatch` when the direction
    /// or label arrays don't match the shape.
    pub fn zeros(
        dim: &[usize],
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
    ) -> Result<Self, TensorError> {
        let ndim = dim.len();
        if axis_dir.len() != ndim {
            return Err(TensorError::ShapeMismatch {
                expected: ndim,
                actual: axis_dir.len(),
            });
        }
        if qnums.len() != ndim {
            return Err(TensorError::ShapeMismatch {
                expected: ndim,
                actual: qnums.len(),
            });
        }
        for (axis, &d) in dim.iter().enumerate() {
            if d == 0 {
                return Err(TensorError::InvalidShape { axis });
            }
            if qnums[axis].len() != d {
                return Err(TensorError::ShapeMismatch {
                    expected: d,
                    actual: qnums[axis].len(),
                });
            }
        }

        let mut dim_blocks = Vec::with_capacity(ndim);
        let mut qnums_blocks = Vec::with_capacity(ndim);
        let mut block_extents: Vec<Vec<usize>> = Vec::with_capacity(ndim);
        for axis in 0..ndim {
            let (values, counts) = partition_axis(qnums[axis]);
            dim_blocks.push(values.len());
            qnums_blocks.push(values);
            block_extents.push(counts);
        }

        let nblocks: usize = dim_blocks.iter().product();
        let mut blocks: Vec<Option<DenseTensor<T>>> = Vec::with_capacity(nblocks);
        let mut index = vec![0usize; ndim];
        for _ in 0..nblocks {
            let qsum: QNum = (0..ndim)
                .map(|i| axis_dir[i].sign() * qnums_blocks[i][index[i]])
                .sum();
            if qsum == 0 {
                let bdim: Vec<usize> = (0..ndim).map(|i| block_extents[i][index[i]]).collect();
                blocks.push(Some(DenseTensor::zeros(&bdim)));
            } else {
                blocks.push(None);
            }
            next_index(&dim_blocks, &mut index);
        }

        Ok(Self {
            dim_logical: dim.to_vec(),
            dim_blocks,
            axis_dir: axis_dir.to_vec(),
            qnums_logical: qnums.iter().map(|q| q.to_vec()).collect(),
            qnums_blocks,
            blocks,
        })
    }

    /// Assemble a tensor from already-derived metadata and blocks.
    ///
    /// Used by the structural transforms, which re-derive the layout
    /// themselves; the caller guarantees the invariants hold.
    pub(crate) fn from_parts(
        dim_logical: Vec<usize>,
        dim_blocks: Vec<usize>,
        axis_dir: Vec<AxisDirection>,
        qnums_logical: Vec<Vec<QNum>>,
        qnums_blocks: Vec<Vec<QNum>>,
        blocks: Vec<Option<DenseTensor<T>>>,
    ) -> Self {
        debug_assert_eq!(blocks.len(), dim_blocks.iter().product::<usize>().max(1));
        Self {
            dim_logical,
            dim_blocks,
            axis_dir,
            qnums_logical,
            qnums_blocks,
            blocks,
        }
    }

    /// Get the rank (number of axes).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dim_logical.len()
    }

    /// Get the dense-view extent per axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.dim_logical
    }

    /// Get the number of distinct labels (block coordinates) per axis.
    #[inline]
    pub fn block_counts(&self) -> &[usize] {
        &self.dim_blocks
    }

    /// Get the axis directions.
    #[inline]
    pub fn axis_directions(&self) -> &[AxisDirection] {
        &self.axis_dir
    }

    /// Get the label attached to each logical position along an axis.
    #[inline]
    pub fn logical_qnums(&self, axis: usize) -> &[QNum] {
        &self.qnums_logical[axis]
    }

    /// Get the distinct labels along an axis, sorted ascending.
    #[inline]
    pub fn block_qnums(&self, axis: usize) -> &[QNum] {
        &self.qnums_blocks[axis]
    }

    /// Total number of block coordinates (occupied or not).
    #[inline]
    pub fn num_blocks_total(&self) -> usize {
        self.blocks.len()
    }

    /// Number of occupied blocks.
    pub fn num_occupied_blocks(&self) -> usize {
        self.blocks.iter().flatten().count()
    }

    /// Total number of stored (structurally nonzero) elements.
    pub fn num_stored_elements(&self) -> usize {
        self.blocks.iter().flatten().map(|b| b.len()).sum()
    }

    /// Whether the direction-weighted label sum vanishes at a block
    /// multi-index, i.e. whether the selection rule allows that block.
    pub fn is_conserved(&self, index: &[usize]) -> bool {
        debug_assert_eq!(index.len(), self.ndim());
        let qsum: QNum = index
            .iter()
            .enumerate()
            .map(|(i, &b)| self.axis_dir[i].sign() * self.qnums_blocks[i][b])
            .sum();
        qsum == 0
    }

    /// Row-major flattening of a block multi-index.
    #[inline]
    pub(crate) fn block_linear(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.ndim());
        index
            .iter()
            .zip(self.dim_blocks.iter())
            .fold(0, |linear, (&b, &n)| {
                debug_assert!(b < n);
                linear * n + b
            })
    }

    /// Get the block at a block multi-index, if occupied.
    pub fn block_at(&self, index: &[usize]) -> Option<&DenseTensor<T>> {
        self.blocks[self.block_linear(index)].as_ref()
    }

    /// Get mutable access to the block at a block multi-index.
    pub(crate) fn block_at_mut(&mut self, index: &[usize]) -> Option<&mut DenseTensor<T>> {
        let linear = self.block_linear(index);
        self.blocks[linear].as_mut()
    }

    /// Find the block coordinate carrying the given label on each axis.
    ///
    /// Returns `None` when some axis has no block with the requested label.
    pub fn block_coords(&self, qnums: &[QNum]) -> Option<BlockIndex> {
        if qnums.len() != self.ndim() {
            return None;
        }
        let mut index = BlockIndex::new();
        for (axis, &q) in qnums.iter().enumerate() {
            match self.qnums_blocks[axis].binary_search(&q) {
                Ok(pos) => index.push(pos),
                Err(_) => return None,
            }
        }
        Some(index)
    }

    /// Retrieve a dense block by its per-axis labels.
    ///
    /// Returns `None` when some axis has no block with the requested label,
    /// or when the addressed block is unoccupied (exact zero). This is a
    /// defined "no such block" result, not an error.
    pub fn get_block(&self, qnums: &[QNum]) -> Option<&DenseTensor<T>> {
        let index = self.block_coords(qnums)?;
        self.block_at(&index)
    }

    /// Retrieve a mutable dense block by its per-axis labels.
    pub fn get_block_mut(&mut self, qnums: &[QNum]) -> Option<&mut DenseTensor<T>> {
        let index = self.block_coords(qnums)?;
        self.block_at_mut(&index)
    }

    /// Iterate over occupied blocks as (block multi-index, block) pairs, in
    /// row-major block order.
    pub fn occupied_blocks(&self) -> impl Iterator<Item = (BlockIndex, &DenseTensor<T>)> {
        self.blocks.iter().enumerate().filter_map(move |(k, slot)| {
            slot.as_ref()
                .map(|block| (self.block_cartesian(k), block))
        })
    }

    /// Block multi-indices of all occupied blocks, in row-major order.
    pub fn occupied_block_indices(&self) -> Vec<BlockIndex> {
        self.occupied_blocks().map(|(index, _)| index).collect()
    }

    /// Iterate mutably over the occupied blocks, in row-major block order.
    ///
    /// Only block values can be changed this way; occupancy is fixed at
    /// construction.
    pub fn occupied_blocks_mut(&mut self) -> impl Iterator<Item = &mut DenseTensor<T>> {
        self.blocks.iter_mut().flatten()
    }

    fn block_cartesian(&self, linear: usize) -> BlockIndex {
        linear_to_cartesian(linear, &self.dim_blocks)
            .into_iter()
            .collect()
    }

    /// Scale all stored elements by `alpha`, in place.
    ///
    /// Absent blocks stay exact zeros; the layout is unchanged.
    pub fn scale(&mut self, alpha: T) {
        for block in self.occupied_blocks_mut() {
            scale_inplace(block, alpha);
        }
    }

    /// Conjugate all stored elements, in place.
    pub fn conj(&mut self) {
        for block in self.occupied_blocks_mut() {
            conj_inplace(block);
        }
    }

    /// Frobenius norm over the stored elements.
    pub fn norm(&self) -> f64 {
        self.blocks
            .iter()
            .flatten()
            .flat_map(|b| b.data())
            .map(|&x| x.abs_sqr())
            .sum::<f64>()
            .sqrt()
    }
}

impl<T: Scalar> std::fmt::Display for BlockSparseTensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BlockSparseTensor(shape={:?}, occupied={}/{}, stored={})",
            self.dim_logical,
            self.num_occupied_blocks(),
            self.num_blocks_total(),
            self.num_stored_elements()
        )
    }
}
