// Error handling module
// Defines the crate-wide error type for the Keepsake API client

use thiserror::Error;

/// Errors that can occur while talking to the Keepsake API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure from the underlying HTTP client
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Keepsake API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
