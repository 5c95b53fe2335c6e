//! Melody Player - Playback Coordination
//!
//! Decides whether a requested track plays immediately, enters the download
//! queue, or is retried, and keeps that consistent with the single audio
//! transport and the notion of "current track".
//!
//! This crate provides:
//! - Track resolution against the backend (ready / accepted / error)
//! - Pending-state registry with cancellable retry timers
//! - Download queue (most recent first, no duplicates)
//! - Playback coordinator (select, toggle, next/previous, repeat, shuffle)
//! - Favorites with optimistic like/unlike
//! - Lyrics cache and saved session identity
//!
//! # Architecture
//!
//! `melody-playback` knows nothing about HTTP or audio output:
//! - The backend is a [`melody_core::MusicApi`]
//! - Audio output is an [`AudioTransport`]
//! - Persistence is a [`melody_core::KeyValueStore`]
//!
//! # Example
//!
//! ```rust,no_run
//! use melody_core::{MusicApi, TrackDescriptor, TrackId};
//! use melody_playback::{NullTransport, PlaybackConfig, PlaybackCoordinator, Selection};
//! use std::sync::Arc;
//!
//! # async fn run(api: Arc<dyn MusicApi>) -> melody_playback::Result<()> {
//! let mut coordinator =
//!     PlaybackCoordinator::new(api, Box::new(NullTransport::new()), PlaybackConfig::default());
//!
//! let track = TrackDescriptor::new(TrackId::new(3135556), "One More Time", "Daft Punk");
//! if coordinator.select_track(track).await? == Selection::Downloading {
//!     // Retries arrive as timer messages
//!     while let Some(message) = coordinator.next_message().await {
//!         coordinator.handle_message(message).await;
//!         if coordinator.pending().is_empty() {
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coordinator;
pub mod deep_link;
pub mod downloads;
pub mod error;
pub mod events;
pub mod favorites;
pub mod library;
pub mod lyrics;
pub mod pending;
pub mod resolver;
pub mod session;
pub mod transport;
pub mod types;

pub use coordinator::{PlaybackCoordinator, Selection, Transition};
pub use deep_link::{enrich_descriptor, parse_start_param};
pub use downloads::DownloadQueue;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use favorites::Favorites;
pub use library::Library;
pub use lyrics::LyricsService;
pub use pending::{PendingEntry, PendingRegistry};
pub use resolver::{CoordinatorMessage, Resolution, TrackResolver};
pub use session::SessionStore;
pub use transport::{AudioTransport, NullTransport};
pub use types::{Acquisition, Attempt, PlaybackConfig, PlaybackSession, PlaybackState, RepeatMode};
