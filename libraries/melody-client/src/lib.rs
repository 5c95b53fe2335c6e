//! Melody Player Backend Client
//!
//! HTTP client library for the music backend that resolves, downloads and
//! stores tracks, plus a client for the LRCLIB lyrics service.
//!
//! # Features
//!
//! - **Playback requests**: ask the backend for a play link (`ready`) or
//!   enqueue a background download (`processing`)
//! - **Library**: fetch a user's library, like/unlike tracks
//! - **Search**: catalogue search
//! - **Status**: per-track acquisition status and download queue estimate
//! - **Lyrics**: synced/plain lyrics lookup
//!
//! Both clients implement the collaborator traits from `melody-core`, so the
//! playback layer never sees reqwest types.
//!
//! # Example
//!
//! ```ignore
//! use melody_client::{ApiConfig, MusicClient};
//! use melody_core::{MusicApi, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MusicClient::new(ApiConfig::new("https://music.example.com"))?;
//!
//!     let library = client.fetch_library(UserId::new(123456)).await?;
//!     println!("Found {} tracks", library.len());
//!
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod error;
mod library;
mod lyrics;
mod playback;
mod search;
mod types;

// Re-export main types
pub use client::MusicClient;
pub use error::{ClientError, Result};
pub use lyrics::LrcLibClient;
pub use types::{ApiConfig, LyricsConfig};

// Re-export sub-clients for direct use if needed
pub use library::LibraryClient;
pub use playback::PlaybackClient;
pub use search::SearchClient;
