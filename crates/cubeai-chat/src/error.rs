//! Error types for cubeai-chat

use thiserror::Error;

/// Fixed user-visible message shown after retries are exhausted.
pub const DISCONNECTED_MESSAGE: &str =
    "Unable to reach the CubeAI assistant. Please check your connection and try again.";

/// Chat error type
#[derive(Debug, Error)]
pub enum Error {
    /// Network/connection error
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Server returned a non-success status
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// None of the known response shapes matched
    #[error("invalid response format")]
    InvalidResponseFormat,

    /// Retries exhausted; the service is treated as disconnected
    #[error("{DISCONNECTED_MESSAGE}")]
    Disconnected,
}

impl Error {
    /// Whether the retry loop should try again on this error.
    ///
    /// Network failures, timeouts, and server-side (5xx) statuses are
    /// retryable; client errors and malformed responses are surfaced
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) => true,
            Error::Api { status, .. } => *status >= 500,
            Error::InvalidResponseFormat | Error::Disconnected => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
