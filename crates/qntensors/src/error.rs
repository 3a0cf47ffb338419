//! Error types for qntensors.

use thiserror::Error;

/// Errors that can occur in tensor operations.
#[derive(Debug, Error)]
pub enum TensorError {
    /// Shape mismatch between data length and expected size.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// An axis of a block-sparse tensor was allocated with zero extent.
    #[error("axis {axis} has zero extent")]
    InvalidShape { axis: usize },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// Axis index out of range for the operation.
    #[error("axis {axis} out of bounds for tensor with {ndim} dimensions")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// Contraction precondition violated on a pair of contracted axes.
    #[error("contracted axes mismatch: {reason}")]
    AxisMismatch { reason: String },

    /// Internal invariant violated: a derived block coordinate that must
    /// exist by construction does not. Signals a malformed input tensor,
    /// not a recoverable condition.
    #[error("structural invariant violated: {reason}")]
    StructuralInvariant { reason: String },
}
