/// Track types shared between the HTTP client and the playback layer
use super::ids::TrackId;
use serde::{Deserialize, Serialize};

/// Title used when a descriptor carries no usable title
pub const UNKNOWN_TITLE: &str = "Unknown Track";

/// Artist used when a descriptor carries no usable artist
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Minimal identifying metadata for a track before playback is resolved
///
/// Comes from library listings and search results. Deep links may only
/// provide the id, in which case the descriptor is incomplete until it has
/// been enriched (see `is_incomplete`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Catalogue identity
    #[serde(rename = "deezer_id")]
    pub id: TrackId,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Cover art URL
    #[serde(default)]
    pub cover_url: String,

    /// Duration in seconds, when the catalogue knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl TrackDescriptor {
    /// Create a descriptor with a title and artist
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            cover_url: String::new(),
            duration: None,
        }
    }

    /// Placeholder for a track known only by its id
    pub fn placeholder(id: TrackId) -> Self {
        Self::new(id, UNKNOWN_TITLE, UNKNOWN_ARTIST)
    }

    /// Set the cover art URL
    #[must_use]
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Whether title or artist are missing
    pub fn is_incomplete(&self) -> bool {
        self.title.trim().is_empty() || self.artist.trim().is_empty()
    }

    /// `Artist - Title` for logs and listings
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// A track with a resolved media locator, ready to attach to a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableTrack {
    /// The descriptor this track was resolved from
    pub descriptor: TrackDescriptor,

    /// Streamable media URL
    pub media_locator: String,

    /// Backend-internal track handle (if the backend reported one)
    pub handle: Option<i64>,
}

impl PlayableTrack {
    /// Attach a resolved locator to a descriptor
    pub fn new(descriptor: TrackDescriptor, media_locator: impl Into<String>, handle: Option<i64>) -> Self {
        Self {
            descriptor,
            media_locator: media_locator.into(),
            handle,
        }
    }

    /// Catalogue identity of this track
    pub fn id(&self) -> TrackId {
        self.descriptor.id
    }
}

/// Answer of the backend to a playback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Media is available now
    Ready {
        /// Streamable media URL
        media_locator: String,
        /// Backend-internal track handle
        handle: Option<i64>,
    },

    /// Accepted for background processing; poll again later
    Accepted,
}

/// Acquisition status as reported by the backend status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStatus {
    /// Backend status string (`ready`, `processing`, `error`)
    pub status: String,

    /// Catalogue identity
    #[serde(rename = "deezer_id")]
    pub id: TrackId,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Cover art URL
    #[serde(default)]
    pub cover_url: String,

    /// Streamable media URL, present once the track is ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_link: Option<String>,

    /// Backend-internal track handle, present once the track is ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<i64>,
}

impl TrackStatus {
    /// Whether the backend reports the track as playable
    pub fn is_ready(&self) -> bool {
        self.status == "ready" && self.play_link.is_some()
    }
}
