//! Core types for playback coordination

use melody_core::PlayableTrack;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the library ends
    #[default]
    Off,

    /// Loop the whole library
    All,

    /// Loop the current track only
    One,
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One -> Off cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,
}

/// Everything the UI renders about the current playback
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// Loaded track, if any
    pub current_track: Option<PlayableTrack>,

    /// Whether the transport is playing
    pub is_playing: bool,

    /// Last reported position
    pub position: Duration,

    /// Duration of the loaded track, when known
    pub duration: Option<Duration>,

    /// Random next-track selection
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Volume (0-100)
    pub volume: u8,
}

impl PlaybackSession {
    pub(crate) fn new(volume: u8) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: volume.min(100),
        }
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), false) => PlaybackState::Paused,
            (Some(_), true) => PlaybackState::Playing,
        }
    }
}

/// Configuration for the coordinator and resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay before re-polling a deferred track (default: 5s)
    pub retry_interval: Duration,

    /// Wait budget shown by the progress ring (default: 15s)
    pub wait_budget: Duration,

    /// Delay between a background completion and its cleanup (default: 1.5s)
    pub settle_delay: Duration,

    /// Number of re-polls before giving up (default: 3)
    pub max_retries: u32,

    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Period of the UI progress clock (default: 100ms)
    pub progress_tick: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_secs(5),
            wait_budget: Duration::from_secs(15),
            settle_delay: Duration::from_millis(1500),
            max_retries: 3,
            volume: 80,
            progress_tick: Duration::from_millis(100),
        }
    }
}

/// Acquisition status of a track identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Acquisition {
    /// Never requested, or forgotten after the download queue was cleared
    #[default]
    NotRequested,

    /// Backend is preparing the track
    Resolving {
        /// End of the wait budget
        deadline: Instant,
    },

    /// Playable
    Ready {
        /// Media locator returned by the backend
        locator: String,
    },

    /// Gave up
    Failed {
        /// Diagnostic reason
        reason: String,
    },
}

impl Acquisition {
    /// Whether the backend is still preparing the track
    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving { .. })
    }
}

/// Which resolution attempt is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// User-initiated request
    First,

    /// Scheduled re-poll of a deferred track
    Retry,
}
