//! Scalar trait for tensor element types.

use std::fmt::Debug;
use std::ops::{Add, Mul};

use faer_traits::ComplexField;

pub use faer::c64;

/// Trait for scalar types supported by qntensors.
///
/// This trait wraps faer's `ComplexField` with the additional bounds and
/// elementwise methods required by the tensor operations.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Complex conjugate; the identity for real types.
    fn conjugate(self) -> Self;

    /// Squared modulus |x|^2 as a real number.
    fn abs_sqr(self) -> f64;
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }

    fn conjugate(self) -> Self {
        self
    }

    fn abs_sqr(self) -> f64 {
        self * self
    }
}

impl Scalar for c64 {
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    fn conjugate(self) -> Self {
        c64::new(self.re, -self.im)
    }

    fn abs_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}
