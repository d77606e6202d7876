//! Per-run source of jitter randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Random generator owned by a single retry run.
///
/// Every run seeds its own generator from OS entropy, so concurrently running
/// loops never contend on a lock or share mutable state. Deterministic seeds
/// are available through [`JitterSource::with_seed`] for tests.
#[derive(Debug, Clone)]
pub struct JitterSource {
    rng: StdRng,
}

impl JitterSource {
    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed, producing a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a value uniformly from `[0.0, 1.0)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Draw a duration uniformly from `[base, 2 * base)`.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    pub fn spread(&mut self, base: Duration) -> Duration {
        let extra = self.fraction_of(base);
        base.saturating_add(extra)
    }

    /// Draw a duration uniformly from `[max / 2, max]`.
    pub fn upper_half(&mut self, max: Duration) -> Duration {
        let half = max / 2;
        let extra = self.fraction_of(max - half);
        half.saturating_add(extra).min(max)
    }

    // f64 rounding can land a hair above `span`; never let it.
    fn fraction_of(&mut self, span: Duration) -> Duration {
        Duration::try_from_secs_f64(span.as_secs_f64() * self.unit())
            .map_or(span, |scaled| scaled.min(span))
    }
}

impl Default for JitterSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_in_range() {
        let mut jitter = JitterSource::from_entropy();
        for _ in 0..1_000 {
            let value = jitter.unit();
            assert!((0.0..1.0).contains(&value), "unit() out of range: {value}");
        }
    }

    #[test]
    fn test_spread_bounds() {
        let mut jitter = JitterSource::with_seed(7);
        let base = Duration::from_millis(100);
        for _ in 0..1_000 {
            let value = jitter.spread(base);
            assert!(value >= base && value <= base * 2, "spread out of range: {value:?}");
        }
    }

    #[test]
    fn test_spread_saturates() {
        let mut jitter = JitterSource::with_seed(1);
        assert!(jitter.spread(Duration::MAX) <= Duration::MAX);
        assert_eq!(jitter.spread(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_upper_half_bounds() {
        let mut jitter = JitterSource::with_seed(3);
        let max = Duration::from_millis(1_000);
        for _ in 0..1_000 {
            let value = jitter.upper_half(max);
            assert!(value >= max / 2 && value <= max, "upper_half out of range: {value:?}");
        }
        assert_eq!(jitter.upper_half(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = JitterSource::with_seed(42);
        let mut b = JitterSource::with_seed(42);
        let base = Duration::from_millis(250);
        for _ in 0..16 {
            assert_eq!(a.spread(base), b.spread(base));
        }
    }
}
