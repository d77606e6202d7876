//! Failures returned by a retried operation.

use std::error::Error;
use std::fmt;

/// A failed attempt, tagged with whether the loop may try again.
///
/// Operations hand one of these back to the retry loop. A
/// [`Failure::Retryable`] consumes one attempt and, if budget remains, is
/// followed by a backoff wait and another attempt. A [`Failure::Terminal`]
/// stops the loop at once; the wrapped value is returned to the caller as-is,
/// never retried and never wrapped again.
///
/// `Failure<E>` implements `From<E>`, so `?` inside an operation produces a
/// retryable failure:
///
/// ```rust
/// use retrier::retry::Failure;
///
/// fn parse(input: &str) -> Result<u16, Failure<std::num::ParseIntError>> {
///     Ok(input.parse::<u16>()?)
/// }
///
/// assert!(parse("nope").unwrap_err().is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure<E> {
    /// Ordinary failure; drives another attempt while budget remains.
    Retryable(E),
    /// Do not retry; return the wrapped value as the final result.
    Terminal(E),
}

/// Mark a failure as terminal so the retry loop stops immediately.
///
/// The loop unwraps the value and returns it verbatim, regardless of how many
/// attempts remain.
///
/// ```rust
/// use retrier::retry::{RetryPolicy, mark_terminal};
///
/// let policy = RetryPolicy::default();
/// let mut calls = 0;
/// let result: Result<(), &str> = policy.run_blocking(|| {
///     calls += 1;
///     Err(mark_terminal("404 not found"))
/// });
/// assert_eq!(result, Err("404 not found"));
/// assert_eq!(calls, 1);
/// ```
pub fn mark_terminal<E>(error: E) -> Failure<E> {
    Failure::Terminal(error)
}

impl<E> Failure<E> {
    /// Wrap a failure that may be retried.
    pub fn retryable(error: E) -> Self {
        Self::Retryable(error)
    }

    /// Wrap a failure that must not be retried.
    pub fn terminal(error: E) -> Self {
        Self::Terminal(error)
    }

    /// Returns `true` for [`Failure::Terminal`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Returns `true` for [`Failure::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    /// Borrow the underlying failure.
    pub fn get_ref(&self) -> &E {
        match self {
            Self::Retryable(error) | Self::Terminal(error) => error,
        }
    }

    /// Unwrap the underlying failure, discarding the tag.
    pub fn into_inner(self) -> E {
        match self {
            Self::Retryable(error) | Self::Terminal(error) => error,
        }
    }
}

impl<E> From<E> for Failure<E> {
    fn from(error: E) -> Self {
        Self::Retryable(error)
    }
}

// Transparent: a wrapped failure displays as the original.
impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get_ref().fmt(f)
    }
}

impl<E: Error> Error for Failure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.get_ref().source()
    }
}
