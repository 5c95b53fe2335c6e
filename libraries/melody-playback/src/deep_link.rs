//! Deep-link handling
//!
//! A Mini-App launched from a shared link receives a start parameter that
//! carries only a track identity. The descriptor is rebuilt from a catalogue
//! search before the track is selected.

use melody_core::{MusicApi, TrackDescriptor, TrackId};
use tracing::{debug, warn};

/// Parse a start parameter into a track identity
///
/// Supported patterns:
/// - `track_{id}`
/// - `{id}`
pub fn parse_start_param(param: &str) -> Result<TrackId, String> {
    let param = param.trim();
    if param.is_empty() {
        return Err("Empty start parameter".to_string());
    }

    let id = param.strip_prefix("track_").unwrap_or(param);
    id.parse::<TrackId>()
        .map_err(|_| format!("Invalid track ID in start parameter: {:?}", param))
}

/// Build a full descriptor for a bare identity
///
/// Searches the catalogue for an exact identity match and falls back to a
/// placeholder ("Unknown Track" / "Unknown Artist"). Never fails.
pub async fn enrich_descriptor(api: &dyn MusicApi, id: TrackId) -> TrackDescriptor {
    match api.search(&id.to_string()).await {
        Ok(results) => {
            if let Some(found) = results.into_iter().find(|t| t.id == id) {
                debug!(track_id = %id, "Deep-link track enriched from search");
                return found;
            }
            debug!(track_id = %id, "No exact search match, using placeholder");
        }
        Err(e) => {
            warn!(track_id = %id, error = %e, "Deep-link enrichment failed");
        }
    }
    TrackDescriptor::placeholder(id)
}
