//! Error types for the homedash-core crate.

use thiserror::Error;

/// Errors that can occur in core catalog/configuration handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The widget configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Failed to read the configuration file.
    #[error("failed to read config from {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the configuration file.
    #[error("failed to write config to {path}: {source}")]
    ConfigWrite {
        /// Path that was written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
