//! Random tensor construction.
//!
//! Random fills are handy for property-style tests: a seeded RNG gives
//! reproducible tensors whose occupied blocks carry generic values.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::blocksparse::BlockSparseTensor;
use crate::error::TensorError;
use crate::qnum::{AxisDirection, QNum};
use crate::scalar::{Scalar, c64};
use crate::tensor::DenseTensor;

/// Trait for types that can be sampled from a uniform distribution.
pub trait RandomUniform: Scalar {
    /// Sample a random value from the uniform distribution [0, 1).
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;
}

impl RandomUniform for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }
}

impl RandomUniform for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }
}

/// Trait for types that can be sampled from a normal distribution.
pub trait RandomNormal: Scalar {
    /// Sample a random value from the standard normal distribution.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomNormal for f64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomNormal for c64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        // Standard complex normal: independent N(0, 1/2) parts so |z|^2
        // has mean 1.
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

impl<T: Scalar + RandomUniform> DenseTensor<T> {
    /// Create a tensor with uniform random values in [0, 1).
    pub fn random(shape: &[usize]) -> Self {
        Self::random_with_rng(shape, &mut rand::rng())
    }

    /// Create a tensor with uniform random values using a specific RNG.
    ///
    /// Useful for reproducible results with a seeded RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use qntensors::DenseTensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t: DenseTensor<f64> = DenseTensor::random_with_rng(&[2, 3], &mut rng);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// ```
    pub fn random_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        let mut t = Self::zeros(shape);
        for x in t.data_mut() {
            *x = T::sample_uniform(rng);
        }
        t
    }
}

impl<T: Scalar + RandomNormal> DenseTensor<T> {
    /// Create a tensor with standard normal random values.
    pub fn random_normal(shape: &[usize]) -> Self {
        Self::random_normal_with_rng(shape, &mut rand::rng())
    }

    /// Create a tensor with standard normal random values using a specific
    /// RNG.
    pub fn random_normal_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        let mut t = Self::zeros(shape);
        for x in t.data_mut() {
            *x = T::sample_normal(rng);
        }
        t
    }
}

impl<T: Scalar + RandomUniform> BlockSparseTensor<T> {
    /// Allocate a block-sparse tensor and fill its occupied blocks with
    /// uniform random values in [0, 1).
    ///
    /// Absent blocks stay exact zeros.
    ///
    /// # Errors
    ///
    /// Same as [`BlockSparseTensor::zeros`].
    pub fn random(
        dim: &[usize],
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
    ) -> Result<Self, TensorError> {
        Self::random_with_rng(dim, axis_dir, qnums, &mut rand::rng())
    }

    /// Allocate a uniformly random block-sparse tensor using a specific
    /// RNG.
    pub fn random_with_rng<R: Rng>(
        dim: &[usize],
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
        rng: &mut R,
    ) -> Result<Self, TensorError> {
        let mut t = Self::zeros(dim, axis_dir, qnums)?;
        for block in t.occupied_blocks_mut() {
            for x in block.data_mut() {
                *x = T::sample_uniform(rng);
            }
        }
        Ok(t)
    }
}

impl<T: Scalar + RandomNormal> BlockSparseTensor<T> {
    /// Allocate a block-sparse tensor with standard normal random values
    /// in its occupied blocks.
    ///
    /// # Errors
    ///
    /// Same as [`BlockSparseTensor::zeros`].
    pub fn random_normal(
        dim: &[usize],
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
    ) -> Result<Self, TensorError> {
        Self::random_normal_with_rng(dim, axis_dir, qnums, &mut rand::rng())
    }

    /// Allocate a normally distributed block-sparse tensor using a
    /// specific RNG.
    pub fn random_normal_with_rng<R: Rng>(
        dim: &[usize],
        axis_dir: &[AxisDirection],
        qnums: &[&[QNum]],
        rng: &mut R,
    ) -> Result<Self, TensorError> {
        let mut t = Self::zeros(dim, axis_dir, qnums)?;
        for block in t.occupied_blocks_mut() {
            for x in block.data_mut() {
                *x = T::sample_normal(rng);
            }
        }
        Ok(t)
    }
}
