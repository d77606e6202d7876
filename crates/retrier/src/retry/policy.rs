use super::exponential::ExponentialBackoff;
use super::jitter::JitterSource;
use std::time::Duration;

/// Attempt budget used when none (or zero) is supplied.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Initial backoff used when none (or zero) is supplied.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(200);

/// Maximum backoff used when none (or zero) is supplied.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(1_000);

/// Immutable retry configuration.
///
/// A policy holds no per-run state, so one instance can drive any number of
/// concurrent runs; clone it or put it behind an `Arc`.
///
/// Every constructor substitutes the documented default for a zero argument,
/// so a policy always allows at least one attempt and always backs off by a
/// positive amount.
///
/// # Examples
///
/// ```rust
/// use retrier::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
/// assert_eq!(policy, RetryPolicy::default());
/// assert_eq!(policy.max_attempts(), 5);
/// assert_eq!(policy.initial_delay(), Duration::from_millis(200));
/// assert_eq!(policy.max_delay(), Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl RetryPolicy {
    /// Create a policy, replacing any zero argument with its default.
    ///
    /// Defaults: 5 attempts, 200ms initial delay, 1000ms maximum delay.
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        let max_attempts = if max_attempts == 0 {
            DEFAULT_MAX_ATTEMPTS
        } else {
            max_attempts
        };
        let initial_delay = if initial_delay.is_zero() {
            DEFAULT_INITIAL_DELAY
        } else {
            initial_delay
        };
        let max_delay = if max_delay.is_zero() {
            DEFAULT_MAX_DELAY
        } else {
            max_delay
        };

        Self {
            max_attempts,
            backoff: ExponentialBackoff::new(initial_delay, max_delay),
        }
    }

    /// Create a new builder for configuring a policy.
    ///
    /// ```rust
    /// use retrier::retry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::builder()
    ///     .max_attempts(3)
    ///     .initial_delay(Duration::from_millis(50))
    ///     .build();
    /// assert_eq!(policy.max_delay(), Duration::from_millis(1000));
    /// ```
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Maximum number of operation invocations in one run (always >= 1).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Base of the exponential schedule.
    pub fn initial_delay(&self) -> Duration {
        self.backoff.initial_delay()
    }

    /// Upper bound on any single wait.
    pub fn max_delay(&self) -> Duration {
        self.backoff.max_delay()
    }

    /// The backoff calculator this policy uses between attempts.
    pub fn backoff(&self) -> &ExponentialBackoff {
        &self.backoff
    }

    /// Compute the wait that follows `attempt` failed invocations.
    pub fn next_delay(&self, attempt: u32, jitter: &mut JitterSource) -> Duration {
        self.backoff.next_delay(attempt, jitter)
    }
}

impl Default for RetryPolicy {
    /// 5 attempts, 200ms initial delay, 1000ms maximum delay.
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY)
    }
}

/// Builder for configuring a [`RetryPolicy`].
///
/// Unset and zero values fall back to the defaults.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
}

impl RetryPolicyBuilder {
    /// Set the attempt budget, including the first attempt.
    ///
    /// Default: 5
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay that the exponential schedule starts from.
    ///
    /// Default: 200ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between attempts.
    ///
    /// Default: 1000ms
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Build the `RetryPolicy`.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            self.initial_delay.unwrap_or(DEFAULT_INITIAL_DELAY),
            self.max_delay.unwrap_or(DEFAULT_MAX_DELAY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_positive_values() {
        let policy = RetryPolicy::new(7, Duration::from_millis(50), Duration::from_secs(2));
        assert_eq!(policy.max_attempts(), 7);
        assert_eq!(policy.initial_delay(), Duration::from_millis(50));
        assert_eq!(policy.max_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_new_substitutes_defaults_for_zero() {
        let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.initial_delay(), DEFAULT_INITIAL_DELAY);
        assert_eq!(policy.max_delay(), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn test_each_argument_defaults_independently() {
        let policy = RetryPolicy::new(2, Duration::ZERO, Duration::from_millis(30));
        assert_eq!(policy.max_attempts(), 2);
        assert_eq!(policy.initial_delay(), DEFAULT_INITIAL_DELAY);
        assert_eq!(policy.max_delay(), Duration::from_millis(30));
    }

    #[test]
    fn test_builder_defaults() {
        assert_eq!(RetryPolicy::builder().build(), RetryPolicy::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let policy = RetryPolicy::builder()
            .max_attempts(9)
            .initial_delay(Duration::from_millis(10))
            .max_delay(Duration::from_millis(90))
            .build();

        assert_eq!(policy.max_attempts(), 9);
        assert_eq!(policy.initial_delay(), Duration::from_millis(10));
        assert_eq!(policy.max_delay(), Duration::from_millis(90));
    }

    #[test]
    fn test_builder_zero_falls_back() {
        let policy = RetryPolicy::builder().max_attempts(0).build();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_policy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<RetryPolicy>();
    }
}
