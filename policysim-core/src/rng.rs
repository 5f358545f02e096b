//! Injectable random source.
//!
//! All randomness in the engine goes through [`RandomSource`]: effect jitter,
//! the event roll and natural drift noise. Production code uses [`SeededRng`];
//! tests can substitute [`FixedRng`] or [`crate::testing::ScriptedRng`] to pin
//! every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform `[0, 1)` samples.
///
/// Only [`RandomSource::next_f64`] is required; the helpers derive every other
/// draw from it so that one call equals one draw regardless of the helper.
pub trait RandomSource {
    /// Uniform sample in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Bernoulli trial with success probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Seedable source backed by [`StdRng`]. Same seed → same game.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Returns the same sample forever.
///
/// `FixedRng::neutral()` (0.5) gives zero effect jitter, zero drift noise and
/// never fires an event whose trigger chance is at most 0.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRng(f64);

impl FixedRng {
    pub fn new(sample: f64) -> Self {
        Self(sample.clamp(0.0, 1.0 - f64::EPSILON))
    }

    pub fn neutral() -> Self {
        Self(0.5)
    }
}

impl RandomSource for FixedRng {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}
