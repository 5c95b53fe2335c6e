//! Error types for the backend client.

use melody_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the music backend or lyrics service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// Classify a reqwest send error
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ServerUnreachable(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { status, message } => CoreError::Server { status, message },
            ClientError::NotFound(what) => CoreError::not_found("Resource", what),
            ClientError::InvalidUrl(msg) => CoreError::invalid_input(msg),
            ClientError::ParseError(msg) => CoreError::Parse(msg),
            ClientError::ServerUnreachable(msg) => CoreError::network(msg),
            ClientError::Request(e) => CoreError::network(e.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
