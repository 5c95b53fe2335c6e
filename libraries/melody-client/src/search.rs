//! Catalogue search.

use crate::client::server_error;
use crate::error::{ClientError, Result};
use melody_core::TrackDescriptor;
use reqwest::Client;
use tracing::debug;

/// Search client for the music backend.
pub struct SearchClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> SearchClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Search the catalogue.
    ///
    /// Blank queries return an empty result without a request.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackDescriptor>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/search/deezer", self.base_url);
        debug!(url = %url, query = %query, "Searching tracks");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        if !body.is_array() {
            return Ok(Vec::new());
        }

        let tracks: Vec<TrackDescriptor> = serde_json::from_value(body).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse search results: {}", e))
        })?;

        debug!(results = tracks.len(), "Search complete");
        Ok(tracks)
    }
}

