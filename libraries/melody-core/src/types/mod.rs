//! Core domain types for Melody Player

mod ids;
mod lyrics;
mod track;

pub use ids::{TrackId, UserId};
pub use lyrics::{LyricLine, Lyrics, LYRICS_NOT_FOUND};
pub use track::{
    PlayableTrack, PlaybackOutcome, TrackDescriptor, TrackStatus, UNKNOWN_ARTIST, UNKNOWN_TITLE,
};
