//! Error types for the tree-table engine
//!
//! Normal tree interaction never fails: rejected moves and lookups of unknown
//! keys are reported as no-op outcomes or `None`. The types here cover the
//! genuine failure paths, namely loading settings and installing the tracing
//! subscriber.

use thiserror::Error;

pub use crate::tracing::TracingError;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// A setting has an invalid value
    #[error("Invalid setting '{field}': {reason}")]
    Validation {
        /// Dotted path of the offending setting
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the crate
#[derive(Debug, Error)]
pub enum TreeError {
    /// Settings error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tracing setup error
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

/// Result type for crate operations
pub type TreeResult<T> = Result<T, TreeError>;

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
