//! qntensors - block-sparse tensors with abelian quantum number
//! conservation.
//!
//! Tensors whose axes carry integer labels (conserved quantum numbers)
//! obey a selection rule: an entry can be nonzero only if the
//! direction-weighted sum of its labels vanishes. This crate stores such
//! tensors block-sparsely, partitioning every axis by label and
//! materializing only the label-conserving dense sub-blocks.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Block-sparse layer (blocksparse module)
//!     → layout construction, lookup, dense ⇄ sparse conversion,
//!       transpose, axis flattening, contraction
//!
//! Level 2: Dense engine (tensor + operations modules)
//!     → DenseTensor buffers, permutedims, scale/conj,
//!       faer-backed accumulating dot
//! ```
//!
//! # Example
//!
//! ```
//! use qntensors::{AxisDirection, BlockSparseTensor};
//!
//! // Two extent-3 axes labeled [-1, 0, 1] with opposite directions.
//! let qnums = [-1, 0, 1];
//! let mut t: BlockSparseTensor<f64> = BlockSparseTensor::zeros(
//!     &[3, 3],
//!     &[AxisDirection::Out, AxisDirection::In],
//!     &[&qnums, &qnums],
//! )
//! .unwrap();
//!
//! // Only the 3 label-conserving blocks of 9 coordinates are allocated.
//! assert_eq!(t.num_occupied_blocks(), 3);
//!
//! t.get_block_mut(&[1, 1]).unwrap().fill(2.0);
//! assert_eq!(t.to_dense().get(&[2, 2]), Some(&2.0));
//! ```

pub mod blocksparse;
pub mod error;
pub mod operations;
pub mod qnum;
pub mod random;
pub mod scalar;
pub mod strides;
pub mod tensor;

pub use blocksparse::{BlockIndex, BlockSparseTensor};
pub use error::TensorError;
pub use qnum::{AxisDirection, QNum, partition_axis, positions_with_qnum};
pub use random::{RandomNormal, RandomUniform};
pub use scalar::{Scalar, c64};
pub use tensor::DenseTensor;
