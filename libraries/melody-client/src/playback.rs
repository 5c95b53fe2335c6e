//! Playback requests and acquisition status.

use crate::client::server_error;
use crate::error::{ClientError, Result};
use crate::types::{PlayResponse, QueueStats};
use melody_core::{PlaybackOutcome, TrackDescriptor, TrackId, TrackStatus};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Playback client for the music backend.
pub struct PlaybackClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> PlaybackClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Request playback of a track.
    ///
    /// `200` carries the play link, `202` means the backend started (or is
    /// still running) a background download. Any other status is an error.
    pub async fn request_playback(&self, track: &TrackDescriptor) -> Result<PlaybackOutcome> {
        let url = format!("{}/api/tracks/play", self.base_url);
        debug!(url = %url, track_id = %track.id, "Requesting playback");

        let response = self
            .http
            .post(&url)
            .json(track)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        match response.status() {
            StatusCode::OK => {
                let body: PlayResponse = response.json().await.map_err(|e| {
                    ClientError::ParseError(format!("Failed to parse play response: {}", e))
                })?;

                let media_locator = body.play_link.filter(|link| !link.is_empty()).ok_or_else(|| {
                    ClientError::ParseError(format!(
                        "Ready response without play link (status {:?})",
                        body.status
                    ))
                })?;

                debug!(track_id = %track.id, "Track is ready");
                Ok(PlaybackOutcome::Ready {
                    media_locator,
                    handle: body.track_id,
                })
            }
            StatusCode::ACCEPTED => {
                debug!(track_id = %track.id, "Track is being processed");
                Ok(PlaybackOutcome::Accepted)
            }
            _ => Err(server_error(response).await),
        }
    }

    /// Get the acquisition status of a track.
    pub async fn track_status(&self, id: TrackId) -> Result<TrackStatus> {
        let url = format!("{}/api/tracks/status/{}", self.base_url, id);
        debug!(url = %url, track_id = %id, "Fetching track status");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse status response: {}", e))
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(format!("track {}", id)))
        } else {
            Err(server_error(response).await)
        }
    }

    /// Estimated wait of the backend download queue, in seconds.
    pub async fn queue_wait_estimate(&self) -> Result<f64> {
        let url = format!("{}/api/queue/stats", self.base_url);
        debug!(url = %url, "Fetching queue stats");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if response.status().is_success() {
            let stats: QueueStats = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse queue stats: {}", e))
            })?;
            Ok(stats.seconds)
        } else {
            Err(server_error(response).await)
        }
    }
}
