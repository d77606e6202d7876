//! Serializable retry configuration.

use crate::error::{ConfigError, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plain-data form of a [`RetryPolicy`], suitable for config files.
///
/// Zero (or a missing field) means "use the default", exactly as with
/// [`RetryPolicy::new`]. An all-zero config therefore produces the default
/// policy rather than a degenerate one.
///
/// # Examples
///
/// ```rust
/// use retrier::{RetryConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let config = RetryConfig::from_toml_str("max_attempts = 3\ninitial_delay_ms = 50").unwrap();
/// let policy = RetryPolicy::from(config);
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.initial_delay(), Duration::from_millis(50));
/// assert_eq!(policy.max_delay(), Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum backoff delay in milliseconds
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `RETRY_MAX_ATTEMPTS` for the attempt budget (must be a valid u32)
    /// - `RETRY_INITIAL_DELAY_MS` for the initial delay (must be a valid u64)
    /// - `RETRY_MAX_DELAY_MS` for the maximum delay (must be a valid u64)
    ///
    /// Unset variables keep their default; malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(max_attempts) = env_number("RETRY_MAX_ATTEMPTS")? {
            config.max_attempts = max_attempts;
        }
        if let Some(initial_delay_ms) = env_number("RETRY_INITIAL_DELAY_MS")? {
            config.initial_delay_ms = initial_delay_ms;
        }
        if let Some(max_delay_ms) = env_number("RETRY_MAX_DELAY_MS")? {
            config.max_delay_ms = max_delay_ms;
        }

        Ok(config)
    }
}

fn env_number<N>(name: &'static str) -> Result<Option<N>>
where
    N: std::str::FromStr<Err = std::num::ParseIntError>,
{
    let Ok(value) = std::env::var(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<N>()
        .map(Some)
        .map_err(|source| ConfigError::InvalidEnvVar {
            name,
            value,
            source,
        })
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        RetryPolicy::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

impl From<&RetryPolicy> for RetryConfig {
    fn from(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts(),
            initial_delay_ms: u64::try_from(policy.initial_delay().as_millis()).unwrap_or(u64::MAX),
            max_delay_ms: u64::try_from(policy.max_delay().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
