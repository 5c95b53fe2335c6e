/// Collaborator traits for Melody Player
///
/// The playback layer depends only on these seams; the HTTP client crate and
/// the stores in `storage` provide the production implementations.
use crate::error::Result;
use crate::types::{Lyrics, PlaybackOutcome, TrackDescriptor, TrackId, TrackStatus, UserId};
use async_trait::async_trait;

/// Music backend API
///
/// Every method is a single request. `request_playback` doubles as the
/// status poll: re-issuing it for a track that is still processing answers
/// `PlaybackOutcome::Accepted` again.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Ask the backend to make a track playable
    ///
    /// # Errors
    /// Returns an error on transport failure or any non-ready/non-accepted answer
    async fn request_playback(&self, track: &TrackDescriptor) -> Result<PlaybackOutcome>;

    /// Fetch the user's library in display order
    async fn fetch_library(&self, user: UserId) -> Result<Vec<TrackDescriptor>>;

    /// Search the catalogue
    async fn search(&self, query: &str) -> Result<Vec<TrackDescriptor>>;

    /// Add a track to the user's library
    async fn like(&self, user: UserId, track: &TrackDescriptor) -> Result<()>;

    /// Remove a track from the user's library
    async fn unlike(&self, user: UserId, track: &TrackDescriptor) -> Result<()>;

    /// Query the acquisition status of a track
    async fn track_status(&self, id: TrackId) -> Result<TrackStatus>;

    /// Estimated wait of the backend download queue in seconds
    async fn queue_wait_estimate(&self) -> Result<f64>;
}

/// Lyrics lookup service
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Look up lyrics by artist and title
    ///
    /// Returns `Lyrics::not_found()` when the service has nothing for the
    /// track; errors are reserved for transport failures.
    async fn fetch_lyrics(&self, artist: &str, title: &str) -> Result<Lyrics>;
}

/// Opaque client-side key-value persistence
///
/// Used for the lyrics cache and the saved session identity.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;
}
