//! The single seedable random source used by every stochastic operation in the model.
//!
//! Reproducibility depends on draw order as much as on the seed: population construction,
//! per-edge transmission and interventions all pull from the same `SimRng`, so a fixed seed
//! combined with a fixed sequence of operations always yields the same run.
mod sampling_algorithms;

use log::trace;

pub use sampling_algorithms::{
    sample_multiple_from_known_length, sample_single_from_known_length,
};

use crate::rand::distr::uniform::{SampleRange, SampleUniform};
use crate::rand::rngs::SmallRng;
use crate::rand::{Rng, SeedableRng};

/// The generator type backing [`SimRng`].
pub type RngType = SmallRng;

pub struct SimRng {
    base_seed: u64,
    rng: RngType,
}

impl SimRng {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        trace!("creating new RNG (seed={base_seed})");
        SimRng {
            base_seed,
            rng: RngType::seed_from_u64(base_seed),
        }
    }

    /// Re-seeds the generator. Subsequent draws are identical to those of
    /// `SimRng::new(base_seed)`.
    pub fn init_random(&mut self, base_seed: u64) {
        trace!("initializing random module");
        self.base_seed = base_seed;
        self.rng = RngType::seed_from_u64(base_seed);
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Gets a random sample by applying the specified sampler function to the generator.
    pub fn sample<T>(&mut self, sampler: impl FnOnce(&mut RngType) -> T) -> T {
        sampler(&mut self.rng)
    }

    /// Gets a random sample within the range provided by `range`. Panics on an empty range, so
    /// callers validate bounds first.
    pub fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(|rng| rng.random_range(range))
    }

    /// Gets a random boolean value which is true with probability `p`. `p` must be in `[0, 1]`.
    pub fn sample_bool(&mut self, p: f64) -> bool {
        self.sample(|rng| rng.random_bool(p))
    }

    /// A uniform sample in `[0, 1)`.
    pub fn sample_unit(&mut self) -> f64 {
        self.sample(|rng| rng.random::<f64>())
    }

    /// Samples `requested` distinct indices from `0..len` uniformly without replacement and
    /// returns them in ascending order. Returns every index when `requested >= len`.
    pub fn sample_distinct_indices(&mut self, len: usize, requested: usize) -> Vec<usize> {
        sample_multiple_from_known_length(&mut self.rng, 0..len, requested)
    }
}
