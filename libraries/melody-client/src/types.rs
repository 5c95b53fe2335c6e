//! Types for backend API requests and responses.

use melody_core::{TrackDescriptor, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Public LRCLIB instance
pub const DEFAULT_LYRICS_URL: &str = "https://lrclib.net";

/// Configuration for connecting to the music backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "https://music.example.com")
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a new config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for the lyrics service.
#[derive(Debug, Clone)]
pub struct LyricsConfig {
    /// Base URL of the LRCLIB instance
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LYRICS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// =============================================================================
// Playback Types
// =============================================================================

/// Body of a `200`/`202` answer from `POST /api/tracks/play`.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub play_link: Option<String>,
    #[serde(default)]
    pub track_id: Option<i64>,
}

/// Answer of `GET /api/queue/stats`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueueStats {
    pub seconds: f64,
}

// =============================================================================
// Library Types
// =============================================================================

/// Request body for like/unlike.
#[derive(Debug, Serialize)]
pub(crate) struct LikeRequest<'a> {
    pub user_id: i64,
    pub deezer_id: i64,
    pub title: &'a str,
    pub artist: &'a str,
    pub cover_url: &'a str,
}

impl<'a> LikeRequest<'a> {
    pub fn new(user: UserId, track: &'a TrackDescriptor) -> Self {
        Self {
            user_id: user.get(),
            deezer_id: track.id.get(),
            title: &track.title,
            artist: &track.artist,
            cover_url: &track.cover_url,
        }
    }
}

// =============================================================================
// Lyrics Types
// =============================================================================

/// LRCLIB `GET /api/get` record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LrcLibRecord {
    #[serde(default)]
    pub synced_lyrics: Option<String>,
    #[serde(default)]
    pub plain_lyrics: Option<String>,
}
