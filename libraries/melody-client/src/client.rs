//! Main backend client.

use crate::error::{ClientError, Result};
use crate::library::LibraryClient;
use crate::playback::PlaybackClient;
use crate::search::SearchClient;
use crate::types::ApiConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the music backend.
///
/// Cheap to clone; the underlying connection pool is shared.
///
/// # Example
///
/// ```ignore
/// use melody_client::{ApiConfig, MusicClient};
///
/// let client = MusicClient::new(ApiConfig::new("https://music.example.com"))?;
/// let outcome = client.playback().request_playback(&track).await?;
/// ```
#[derive(Clone)]
pub struct MusicClient {
    http: Client,
    url: String,
}

impl MusicClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let url = normalize_url(&config.url)?;

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("MelodyPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, url })
    }

    /// Get the backend URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Playback requests, status and queue statistics.
    pub fn playback(&self) -> PlaybackClient<'_> {
        PlaybackClient::new(&self.http, &self.url)
    }

    /// Library listing and likes.
    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(&self.http, &self.url)
    }

    /// Catalogue search.
    pub fn catalog(&self) -> SearchClient<'_> {
        SearchClient::new(&self.http, &self.url)
    }
}

/// Validate a base URL and strip trailing slashes.
pub(crate) fn normalize_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed =
        Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(url.trim_end_matches('/').to_string())
}

/// Turn a non-success response into a `ServerError`.
pub(crate) async fn server_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ClientError::ServerError { status, message }
}
