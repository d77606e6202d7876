//! Retry loop: invoke an operation until it succeeds or the run must stop.

use super::failure::Failure;
use super::jitter::JitterSource;
use super::policy::RetryPolicy;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What the loop does after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision<E> {
    /// Stop and return this failure to the caller.
    Stop(E),
    /// Wait `delay`, then try again. `error` is returned instead if the wait
    /// is cancelled.
    RetryAfter {
        /// Backoff before the next attempt.
        delay: Duration,
        /// The failure just observed.
        error: E,
    },
}

/// State of a single retry run: the attempt counter and its jitter source.
///
/// [`RetryPolicy::run`] and friends create one of these per call. It is
/// public for callers that need to drive their own loop step by step.
///
/// ```rust
/// use retrier::retry::{Failure, JitterSource, RetryDecision, RetryPolicy, RetryRun};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(2, Duration::from_millis(10), Duration::from_millis(10));
/// let mut run = RetryRun::with_jitter(policy, JitterSource::with_seed(1));
///
/// assert!(matches!(run.record_failure(Failure::retryable("a")), RetryDecision::RetryAfter { .. }));
/// assert_eq!(run.record_failure(Failure::retryable("b")), RetryDecision::Stop("b"));
/// assert_eq!(run.attempts(), 2);
/// ```
#[derive(Debug)]
pub struct RetryRun {
    policy: RetryPolicy,
    attempts: u32,
    jitter: JitterSource,
}

impl RetryRun {
    /// Start a run with a freshly seeded jitter source.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_jitter(policy, JitterSource::from_entropy())
    }

    /// Start a run with the given jitter source.
    pub fn with_jitter(policy: RetryPolicy, jitter: JitterSource) -> Self {
        Self {
            policy,
            attempts: 0,
            jitter,
        }
    }

    /// Number of failed invocations recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record a failed invocation and decide whether to try again.
    ///
    /// Terminal failures stop the run regardless of the remaining budget.
    /// A retryable failure stops the run once `max_attempts` invocations have
    /// failed; no delay is computed for the final one.
    pub fn record_failure<E>(&mut self, failure: Failure<E>) -> RetryDecision<E> {
        self.attempts = self.attempts.saturating_add(1);
        let max_attempts = self.policy.max_attempts();

        match failure {
            Failure::Terminal(error) => {
                tracing::debug!(attempt = self.attempts, "Terminal failure, not retrying");
                RetryDecision::Stop(error)
            }
            Failure::Retryable(error) if self.attempts >= max_attempts => {
                tracing::warn!(attempts = self.attempts, "Retry budget exhausted");
                RetryDecision::Stop(error)
            }
            Failure::Retryable(error) => {
                let delay = self.policy.next_delay(self.attempts, &mut self.jitter);
                tracing::debug!(
                    attempt = self.attempts,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after failure"
                );
                RetryDecision::RetryAfter { delay, error }
            }
        }
    }

    fn record_success(&self) {
        if self.attempts > 0 {
            tracing::trace!(attempts = self.attempts + 1, "Retry succeeded");
        }
    }
}

impl RetryPolicy {
    /// Run `operation` until it succeeds, fails terminally, or exhausts the
    /// attempt budget.
    ///
    /// Returns the success value, the unwrapped terminal failure, or the last
    /// retryable failure.
    ///
    /// ```rust
    /// use retrier::retry::{Failure, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// # async fn example() {
    /// let policy = RetryPolicy::new(3, Duration::from_millis(10), Duration::from_millis(100));
    /// let result = policy
    ///     .run(|| async { Err::<(), _>(Failure::retryable("still down")) })
    ///     .await;
    /// assert_eq!(result, Err("still down"));
    /// # }
    /// ```
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure<E>>>,
    {
        let never = CancellationToken::new();
        self.run_cancellable(&never, |_| operation()).await
    }

    /// Like [`RetryPolicy::run`], but stops waiting once `cancel` fires.
    ///
    /// The operation receives a clone of the token and should observe it to
    /// return promptly. The loop itself checks the token only while backing
    /// off: if it fires before the delay elapses, the most recent failure is
    /// returned and no further attempt starts.
    ///
    /// Note: there is no dedicated "cancelled" error. A cancelled run returns
    /// the caller's own last failure.
    pub async fn run_cancellable<F, Fut, T, E>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, Failure<E>>>,
    {
        let mut run = RetryRun::new(*self);
        loop {
            let failure = match operation(cancel.clone()).await {
                Ok(value) => {
                    run.record_success();
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            match run.record_failure(failure) {
                RetryDecision::Stop(error) => return Err(error),
                RetryDecision::RetryAfter { delay, error } => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            tracing::debug!(attempts = run.attempts(), "Retry cancelled during backoff");
                            return Err(error);
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Run a synchronous `operation` on the current thread.
    ///
    /// Same stopping rules as [`RetryPolicy::run`]; waits with
    /// `std::thread::sleep`, so do not call this from async code.
    pub fn run_blocking<F, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, Failure<E>>,
    {
        let mut run = RetryRun::new(*self);
        loop {
            let failure = match operation() {
                Ok(value) => {
                    run.record_success();
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            match run.record_failure(failure) {
                RetryDecision::Stop(error) => return Err(error),
                RetryDecision::RetryAfter { delay, .. } => std::thread::sleep(delay),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(2))
    }

    #[test]
    fn test_record_failure_counts_attempts() {
        let mut run = RetryRun::with_jitter(fast_policy(3), JitterSource::with_seed(1));

        assert!(matches!(
            run.record_failure(Failure::retryable(1)),
            RetryDecision::RetryAfter { error: 1, .. }
        ));
        assert!(matches!(
            run.record_failure(Failure::retryable(2)),
            RetryDecision::RetryAfter { error: 2, .. }
        ));
        assert_eq!(run.record_failure(Failure::retryable(3)), RetryDecision::Stop(3));
        assert_eq!(run.attempts(), 3);
    }

    #[test]
    fn test_terminal_bypasses_budget() {
        let mut run = RetryRun::with_jitter(fast_policy(1), JitterSource::with_seed(1));
        assert_eq!(run.record_failure(Failure::terminal("x")), RetryDecision::Stop("x"));
        assert_eq!(run.attempts(), 1);
    }

    #[test]
    fn test_retry_delay_within_policy_bounds() {
        let policy = RetryPolicy::new(100, Duration::from_millis(5), Duration::from_millis(40));
        let mut run = RetryRun::with_jitter(policy, JitterSource::with_seed(99));

        for _ in 0..99 {
            match run.record_failure(Failure::retryable(())) {
                RetryDecision::RetryAfter { delay, .. } => {
                    assert!(delay <= Duration::from_millis(40), "delay {delay:?}")
                }
                RetryDecision::Stop(()) => panic!("stopped before budget was spent"),
            }
        }
        assert_eq!(run.record_failure(Failure::retryable(())), RetryDecision::Stop(()));
    }

    #[test]
    fn test_blocking_eventual_success() {
        let mut tries = 0;
        let result: Result<u32, &str> = fast_policy(5).run_blocking(|| {
            tries += 1;
            if tries == 2 {
                Ok(tries)
            } else {
                Err(Failure::retryable("test error"))
            }
        });

        assert_eq!(result, Ok(2));
        assert_eq!(tries, 2);
    }

    #[test]
    fn test_blocking_exhaustion_returns_last_failure() {
        let mut tries = 0;
        let result: Result<(), u32> = fast_policy(4).run_blocking(|| {
            tries += 1;
            Err(Failure::retryable(tries))
        });

        assert_eq!(result, Err(4));
        assert_eq!(tries, 4);
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let result = RetryPolicy::default()
            .run(|| async { Ok::<_, Failure<std::io::Error>>(42) })
            .await;

        assert_eq!(assert_ok!(result), 42);
    }

    #[tokio::test]
    async fn test_retry_success_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result = fast_policy(5)
            .run(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    let current = attempts.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err(Failure::retryable(std::io::Error::other("retry me")))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(assert_ok!(result), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_failure_stops_immediately() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result = fast_policy(5)
            .run(|| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(Failure::terminal(std::io::Error::other("auth failed")))
                }
            })
            .await;

        let error = assert_err!(result);
        assert_eq!(error.to_string(), "auth failed");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_token_allows_one_attempt() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut tries = 0;

        let result: Result<(), &str> = RetryPolicy::new(100, Duration::from_secs(1), Duration::from_secs(1))
            .run_cancellable(&cancel, |_| {
                tries += 1;
                async { Err(Failure::retryable("down")) }
            })
            .await;

        assert_eq!(result, Err("down"));
        assert_eq!(tries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_receives_token() {
        let cancel = CancellationToken::new();
        let result: Result<bool, ()> = fast_policy(1)
            .run_cancellable(&cancel, |token| async move { Ok(token.is_cancelled()) })
            .await;

        assert_eq!(result, Ok(false));
    }
}
