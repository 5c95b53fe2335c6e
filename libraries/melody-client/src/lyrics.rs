//! LRCLIB lyrics lookup.

use crate::client::{normalize_url, server_error};
use crate::error::{ClientError, Result};
use crate::types::{LrcLibRecord, LyricsConfig};
use async_trait::async_trait;
use melody_core::{Lyrics, LyricsProvider};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Client for an LRCLIB instance.
#[derive(Clone)]
pub struct LrcLibClient {
    http: Client,
    url: String,
}

impl LrcLibClient {
    /// Create a new lyrics client.
    pub fn new(config: LyricsConfig) -> Result<Self> {
        let url = normalize_url(&config.url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("MelodyPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, url })
    }

    /// Look up lyrics by artist and track name.
    ///
    /// A `404` means LRCLIB has no record and yields `Lyrics::not_found()`.
    pub async fn get_lyrics(&self, artist: &str, title: &str) -> Result<Lyrics> {
        let url = format!("{}/api/get", self.url);
        debug!(url = %url, artist = %artist, title = %title, "Fetching lyrics");

        let response = self
            .http
            .get(&url)
            .query(&[("artist_name", artist), ("track_name", title)])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(Lyrics::not_found());
        }
        if !status.is_success() {
            return Err(server_error(response).await);
        }

        let record: LrcLibRecord = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse lyrics response: {}", e))
        })?;

        Ok(Lyrics::from_sources(
            record.synced_lyrics.as_deref(),
            record.plain_lyrics.as_deref(),
        ))
    }
}

#[async_trait]
impl LyricsProvider for LrcLibClient {
    async fn fetch_lyrics(&self, artist: &str, title: &str) -> melody_core::Result<Lyrics> {
        Ok(self.get_lyrics(artist, title).await?)
    }
}
