//! Block-sparse tensors with abelian quantum number conservation.
//!
//! The submodules split the engine along its operations: construction,
//! lookup and elementwise value updates ([`tensor`]), dense ⇄ block-sparse
//! conversion ([`convert`]), axis permutation ([`transpose`]), adjacent-axis
//! merging ([`flatten`]), and block-sparse contraction ([`contract`]).

mod contract;
mod convert;
mod flatten;
mod tensor;
mod transpose;

pub use tensor::{BlockIndex, BlockSparseTensor};
