//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! The coordinator buffers events as it changes state; the front end
//! drains them after every call and re-renders.

use crate::types::{PlaybackState, RepeatMode};
use melody_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed (idle, paused, playing)
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track was attached to the transport
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track entered the download queue
    DownloadQueued {
        /// Deferred track
        track_id: TrackId,
    },

    /// Background acquisition finished; the track is now playable
    DownloadCompleted {
        /// Completed track
        track_id: TrackId,
    },

    /// Acquisition gave up
    DownloadFailed {
        /// Failed track
        track_id: TrackId,
        /// Diagnostic reason
        reason: String,
    },

    /// Pending state for a track was removed
    PendingCleared {
        /// Track whose progress ring disappears
        track_id: TrackId,
    },

    /// Download queue was cleared by the user
    DownloadsCleared {
        /// Number of removed entries
        count: usize,
    },

    /// Library was (re)loaded
    LibraryRefreshed {
        /// Number of tracks in the library
        tracks: usize,
    },

    /// Favorite flag of a track changed
    FavoriteChanged {
        /// Affected track
        track_id: TrackId,
        /// New flag
        liked: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New mode
        mode: RepeatMode,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// New flag
        enabled: bool,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
    },
}
