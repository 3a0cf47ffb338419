//! Dense tensor operations.
//!
//! These are the dense-engine kernels the block-sparse layer delegates to:
//! axis permutation, elementwise scale/conjugate, and the accumulating
//! tensor dot product.

mod dot;
mod elementwise;
mod permutedims;

pub use dot::{dot, dot_update};
pub use elementwise::{conj, conj_inplace, scale, scale_inplace};
pub use permutedims::{permutedims, permutedims_into, validate_permutation};
