//! Lyrics lookup with a client-side cache

use melody_core::{KeyValueStore, Lyrics, LyricsProvider, TrackDescriptor, TrackId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache key for a track's lyrics
pub fn cache_key(id: TrackId) -> String {
    format!("lyrics_{}", id)
}

/// Fetches lyrics once per track and remembers them
///
/// Cached values are stored as JSON `{"lyrics": [...], "is_synced": bool}`.
/// A failed lookup yields "not found" without being cached, so it is
/// retried next time.
pub struct LyricsService {
    provider: Arc<dyn LyricsProvider>,
    store: Arc<dyn KeyValueStore>,
}

impl LyricsService {
    /// Create a service over a provider and a store
    pub fn new(provider: Arc<dyn LyricsProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { provider, store }
    }

    /// Lyrics for `track`, from cache when available
    pub async fn lyrics_for(&self, track: &TrackDescriptor) -> Lyrics {
        let key = cache_key(track.id);

        if let Some(cached) = self.cached(&key) {
            debug!(track_id = %track.id, "Lyrics cache hit");
            return cached;
        }

        let lyrics = match self.provider.fetch_lyrics(&track.artist, &track.title).await {
            Ok(lyrics) => lyrics,
            Err(e) => {
                warn!(track_id = %track.id, error = %e, "Lyrics lookup failed");
                return Lyrics::not_found();
            }
        };

        match serde_json::to_string(&lyrics) {
            Ok(json) => {
                if let Err(e) = self.store.set(&key, &json) {
                    warn!(key = %key, error = %e, "Failed to cache lyrics");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to encode lyrics"),
        }

        lyrics
    }

    fn cached(&self, key: &str) -> Option<Lyrics> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "Lyrics cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(lyrics) => Some(lyrics),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding corrupt lyrics cache entry");
                None
            }
        }
    }
}
