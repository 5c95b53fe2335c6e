//! Library operations for the music backend.

use crate::client::server_error;
use crate::error::{ClientError, Result};
use crate::types::LikeRequest;
use melody_core::{TrackDescriptor, UserId};
use reqwest::Client;
use tracing::debug;

/// Library client for the music backend.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Get a user's library in display order.
    ///
    /// A body that is valid JSON but not an array (the backend answers
    /// `null` for users without tracks) yields an empty library.
    pub async fn get_library(&self, user: UserId) -> Result<Vec<TrackDescriptor>> {
        let url = format!("{}/api/tracks", self.base_url);
        debug!(url = %url, user_id = %user, "Fetching library");

        let response = self
            .http
            .get(&url)
            .query(&[("user_id", user.get())])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse library response: {}", e))
        })?;

        if !body.is_array() {
            debug!(user_id = %user, "Library response is not a list, treating as empty");
            return Ok(Vec::new());
        }

        let tracks: Vec<TrackDescriptor> = serde_json::from_value(body).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse library tracks: {}", e))
        })?;

        debug!(tracks = tracks.len(), "Fetched library");
        Ok(tracks)
    }

    /// Add a track to the user's library.
    pub async fn like(&self, user: UserId, track: &TrackDescriptor) -> Result<()> {
        self.post_like("like", user, track).await
    }

    /// Remove a track from the user's library.
    pub async fn unlike(&self, user: UserId, track: &TrackDescriptor) -> Result<()> {
        self.post_like("unlike", user, track).await
    }

    async fn post_like(&self, action: &str, user: UserId, track: &TrackDescriptor) -> Result<()> {
        let url = format!("{}/api/tracks/{}", self.base_url, action);
        debug!(url = %url, user_id = %user, track_id = %track.id, "Updating like");

        let response = self
            .http
            .post(&url)
            .json(&LikeRequest::new(user, track))
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(server_error(response).await)
        }
    }
}
