//! Exponential backoff with full jitter.

use super::jitter::JitterSource;
use std::time::Duration;

/// Jittered exponential backoff, clamped to a maximum delay.
///
/// # Mathematical Formula
///
/// For attempt `n` (1-indexed, the number of failures observed so far):
/// ```text
/// base  = initial_delay * 2^(n - 1)
/// delay = min(random[base, 2 * base), max_delay)
/// ```
///
/// When `base` cannot be represented, or already reaches `max_delay`, the
/// delay is drawn from `[max_delay / 2, max_delay]` instead. A zero
/// `initial_delay` uses `max_delay` as the base so a retry loop never spins.
/// The result always lies in `[0, max_delay]`.
///
/// # Examples
///
/// ```rust
/// use retrier::retry::{ExponentialBackoff, JitterSource};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(5));
/// let mut jitter = JitterSource::from_entropy();
///
/// let delay = backoff.next_delay(3, &mut jitter);
/// assert!(delay >= Duration::from_millis(400));
/// assert!(delay <= Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
}

impl ExponentialBackoff {
    /// Create a backoff calculator.
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }

    /// Delay before the first retry, before doubling.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound on any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Compute the wait after `attempt` failed invocations.
    ///
    /// `attempt` is 1-based; `0` is treated as `1`. Never panics.
    pub fn next_delay(&self, attempt: u32, jitter: &mut JitterSource) -> Duration {
        match self.base_delay(attempt) {
            Some(base) if base < self.max_delay => jitter.spread(base).min(self.max_delay),
            _ => jitter.upper_half(self.max_delay),
        }
    }

    /// `initial_delay * 2^(attempt - 1)`, or `None` on overflow.
    fn base_delay(&self, attempt: u32) -> Option<Duration> {
        if self.initial_delay.is_zero() {
            return Some(self.max_delay);
        }
        let exponent = attempt.saturating_sub(1);
        2u32.checked_pow(exponent)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
    }
}
