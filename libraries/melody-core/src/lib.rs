//! Melody Player Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for
//! Melody Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `PlayableTrack`, `Lyrics`, ids
//! - **Collaborator Traits**: `MusicApi`, `LyricsProvider`, `KeyValueStore`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use melody_core::{Lyrics, TrackDescriptor, TrackId};
//!
//! let track = TrackDescriptor::new(TrackId::new(3135556), "Harder, Better, Faster, Stronger", "Daft Punk");
//! assert!(!track.is_incomplete());
//!
//! let lyrics = Lyrics::from_synced("[00:01.50] Work it\n[00:03.00] Make it");
//! assert_eq!(lyrics.active_index(2.0), Some(0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use storage::{JsonFileStore, MemoryStore};
pub use traits::{KeyValueStore, LyricsProvider, MusicApi};

#[cfg(feature = "mocks")]
pub use traits::{MockLyricsProvider, MockMusicApi};

pub use types::{
    LyricLine, Lyrics, PlayableTrack, PlaybackOutcome, TrackDescriptor, TrackId, TrackStatus,
    UserId, LYRICS_NOT_FOUND, UNKNOWN_ARTIST, UNKNOWN_TITLE,
};
