//! Tower heights for newly inserted nodes.
//!
//! Every node is on the base level. Each express level above that is joined
//! with probability `p`, independently, until a draw fails or the cap is hit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Decides how many express levels a new node joins.
pub trait LevelGenerator {
    /// Returns a height in `0..=max`. `0` means base level only.
    fn height(&mut self, max: usize) -> usize;
}

/// Coin-flip promotion: keep climbing while a uniform `[0, 1)` draw is below `p`.
#[derive(Debug, Clone)]
pub struct GeometricLevels<R = StdRng> {
    probability: f64,
    rng: R,
}

impl<R: Rng> GeometricLevels<R> {
    pub fn new(probability: f64, rng: R) -> Self {
        if !(probability > 0.0 && probability < 1.0) {
            warn!(probability, "promotion probability outside (0, 1)");
        }
        GeometricLevels { probability, rng }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl GeometricLevels<StdRng> {
    /// Reproducible heights from a fixed seed.
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::new(probability, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(probability: f64) -> Self {
        Self::new(probability, StdRng::from_entropy())
    }
}

impl<R: Rng> LevelGenerator for GeometricLevels<R> {
    fn height(&mut self, max: usize) -> usize {
        let mut height = 0;
        while height < max && self.rng.gen::<f64>() < self.probability {
            height += 1;
        }
        height
    }
}
