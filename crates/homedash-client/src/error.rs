//! Error types for the homedash-client crate.

use thiserror::Error;

/// Errors raised by catalog API calls.
///
/// A [`ClientError::Status`] is terminal for the call that produced it;
/// callers never receive a partial result alongside it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL could not be parsed.
    #[error("invalid server url {url}: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("server returned {status} {reason}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// Transport-level or body-decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
