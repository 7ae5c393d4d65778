//! Error types for configuration loading

use thiserror::Error;

/// Result type alias for filings-utils
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The assembled configuration is inconsistent
    #[error("Configuration error: {0}")]
    Invalid(String),
}
