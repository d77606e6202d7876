#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry policy executor with jittered exponential backoff.
//!
//! This crate re-invokes a fallible unit of work until it succeeds, until it
//! returns a failure marked as terminal, until the attempt budget is spent, or
//! until an external [`CancellationToken`](tokio_util::sync::CancellationToken)
//! fires while the loop is waiting between attempts.
//!
//! - **Retry loop** via [`RetryPolicy::run`], [`RetryPolicy::run_cancellable`]
//!   and [`RetryPolicy::run_blocking`]
//! - **Backoff calculator** via [`ExponentialBackoff`] (full jitter, clamped)
//! - **Terminal failures** via [`mark_terminal`] and [`Failure`]
//! - **Configuration** via [`RetryConfig`] (serde, TOML, environment)
//!
//! The loop never invents an error of its own. Whatever stops it, the caller
//! receives either the success value or its own most recent failure.
//!
//! # Examples
//!
//! ```rust
//! use retrier::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let policy = RetryPolicy::new(5, Duration::from_millis(50), Duration::from_millis(500));
//!
//! let value = policy
//!     .run(|| async {
//!         let body = std::fs::read_to_string("/etc/hostname").map_err(Failure::retryable)?;
//!         if body.is_empty() {
//!             return Err(mark_terminal(std::io::Error::other("empty hostname")));
//!         }
//!         Ok(body)
//!     })
//!     .await?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod retry;

pub use config::RetryConfig;
pub use error::ConfigError;
pub use retry::{
    ExponentialBackoff, Failure, JitterSource, RetryDecision, RetryPolicy, RetryPolicyBuilder,
    RetryRun, mark_terminal,
};

/// Convenient re-exports of commonly used items.
///
/// Import the whole retry surface with:
///
/// ```rust
/// use retrier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RetryConfig;
    pub use crate::retry::{Failure, RetryPolicy, mark_terminal};
    pub use tokio_util::sync::CancellationToken;
}
