//! Grid-cell sampling for the coordinate cross-check.
//!
//! Reprojecting every cell of a large grid is wasteful; a 10x10 sample is
//! enough to catch systematic coordinate errors. Sampling is seeded so a
//! run (and its failures) can be reproduced; pass a different seed to vary
//! the sampled cells between runs.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default RNG seed for sampled coordinate checks.
pub const DEFAULT_SAMPLE_SEED: u64 = 0x1f6d_2c4a_9be3_7051;

/// Sampling policy for the geographic cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    /// Indices drawn per axis (rows and columns independently).
    pub points_per_axis: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            points_per_axis: 10,
            seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

impl SampleConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

/// Draw up to `want` distinct indices in `0..len`, sorted ascending.
///
/// Axes shorter than `want` are sampled exhaustively.
pub fn sample_indices(rng: &mut StdRng, len: usize, want: usize) -> Vec<usize> {
    let amount = want.min(len);
    let mut indices = rand::seq::index::sample(rng, len, amount).into_vec();
    indices.sort_unstable();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_sorted_and_distinct() {
        let mut rng = SampleConfig::default().rng();
        let indices = sample_indices(&mut rng, 100, 10);
        assert_eq!(indices.len(), 10);
        for pair in indices.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(indices.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_sample_is_reproducible() {
        let config = SampleConfig::with_seed(42);
        let a = sample_indices(&mut config.rng(), 500, 10);
        let b = sample_indices(&mut config.rng(), 500, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_sample() {
        let a = sample_indices(&mut SampleConfig::with_seed(1).rng(), 500, 10);
        let b = sample_indices(&mut SampleConfig::with_seed(2).rng(), 500, 10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_axis_sampled_exhaustively() {
        let mut rng = SampleConfig::default().rng();
        let indices = sample_indices(&mut rng, 4, 10);
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
