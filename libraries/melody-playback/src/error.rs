//! Error types for playback coordination

use melody_core::CoreError;
use thiserror::Error;

/// Playback errors
///
/// Resolution failures are not errors at this level: they degrade to
/// "nothing plays" and are reported through events. These variants cover
/// transport failures and misuse.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Backend call failed
    #[error("API error: {0}")]
    Api(#[from] CoreError),

    /// Audio transport rejected an operation
    #[error("Audio transport error: {0}")]
    Transport(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Operation needs a user identity and none is set
    #[error("No user identity set")]
    NoUser,

    /// Client-side persistence failed
    #[error("Store error: {0}")]
    Store(#[source] CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
