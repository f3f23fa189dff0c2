//! Error types for cubeai-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The animation controller task is no longer running
    #[error("animation controller stopped")]
    AnimationStopped,

    /// Invalid configuration value
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// Session key material is missing or malformed
    #[error("session error: {0}")]
    Session(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
