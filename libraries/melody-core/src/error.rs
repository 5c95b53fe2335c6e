/// Core error types for Melody Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Melody Player
///
/// Collaborator implementations (HTTP client, stores) convert their own
/// errors into this type so the playback layer can stay transport-agnostic.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service answered with an error status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The remote service answered with a body we could not understand
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_includes_status() {
        let err = CoreError::Server {
            status: 500,
            message: "failed to process track".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (500): failed to process track");
    }

    #[test]
    fn not_found_message() {
        let err = CoreError::not_found("Track", "42");
        assert_eq!(err.to_string(), "Track not found: 42");
    }
}
