//! Error types for loading retry configuration.
//!
//! The retry loop itself never produces errors of its own; it hands back the
//! operation's failures. Only the configuration layer can fail.

use thiserror::Error;

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Failure to load a [`RetryConfig`](crate::RetryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("{name} must be a non-negative integer, got: '{value}'")]
    InvalidEnvVar {
        /// Name of the offending variable
        name: &'static str,
        /// Raw value found in the environment
        value: String,
        /// Underlying parse failure
        #[source]
        source: std::num::ParseIntError,
    },

    /// A TOML document could not be parsed into a configuration.
    #[error("Invalid retry configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
