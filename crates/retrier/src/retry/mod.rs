//! Retry loop and backoff implementation.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - Immutable, shareable retry configuration and entry point
//! - [`ExponentialBackoff`] - Jittered exponential delay, clamped to a maximum
//! - [`Failure`] - Retryable or terminal failure returned by an operation
//! - [`JitterSource`] - Random generator owned by a single retry run
//!
//! # Examples
//!
//! ```rust
//! use retrier::retry::{Failure, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5));
//! let mut calls = 0;
//! let result: Result<u32, &str> = policy.run_blocking(|| {
//!     calls += 1;
//!     if calls < 2 { Err(Failure::retryable("busy")) } else { Ok(calls) }
//! });
//! assert_eq!(result, Ok(2));
//! ```

mod exponential;
mod failure;
mod jitter;
mod policy;
mod run;

pub use exponential::ExponentialBackoff;
pub use failure::{Failure, mark_terminal};
pub use jitter::JitterSource;
pub use policy::{
    DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, RetryPolicy,
    RetryPolicyBuilder,
};
pub use run::{RetryDecision, RetryRun};
