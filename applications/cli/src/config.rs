/// Application configuration
use crate::error::{CliError, Result};
use melody_client::{ApiConfig, LyricsConfig};
use melody_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "melody.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_lyrics")]
    pub lyrics: LyricsSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LyricsSettings {
    #[serde(default = "default_lyrics_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    #[serde(default = "default_wait_budget_ms")]
    pub wait_budget_ms: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_volume")]
    pub volume: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `melody.toml` is read if
    /// present. Environment variables prefixed with `MELODY_` override both,
    /// with `__` between section and key (`MELODY_API__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MELODY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_url("lyrics.base_url", &self.lyrics.base_url)?;

        if self.api.timeout_secs == 0 {
            return Err(CliError::Config("api.timeout_secs must be positive".to_string()));
        }
        if self.playback.retry_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.retry_interval_ms must be positive".to_string(),
            ));
        }
        if self.playback.wait_budget_ms == 0 {
            return Err(CliError::Config(
                "playback.wait_budget_ms must be positive".to_string(),
            ));
        }
        if self.playback.max_retries == 0 {
            return Err(CliError::Config(
                "playback.max_retries must be positive".to_string(),
            ));
        }
        if self.playback.volume > 100 {
            return Err(CliError::Config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        Ok(())
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    pub fn lyrics_config(&self) -> LyricsConfig {
        LyricsConfig {
            url: self.lyrics.base_url.clone(),
            ..LyricsConfig::default()
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            retry_interval: Duration::from_millis(self.playback.retry_interval_ms),
            wait_budget: Duration::from_millis(self.playback.wait_budget_ms),
            settle_delay: Duration::from_millis(self.playback.settle_delay_ms),
            max_retries: self.playback.max_retries,
            volume: self.playback.volume,
            ..PlaybackConfig::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            lyrics: default_lyrics(),
            playback: default_playback(),
            storage: default_storage(),
        }
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(CliError::Config(format!("{} is required", field)));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::Config(format!(
            "{} must start with http:// or https://, got {:?}",
            field, url
        )));
    }
    Ok(())
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        base_url: default_api_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_lyrics() -> LyricsSettings {
    LyricsSettings {
        base_url: default_lyrics_url(),
    }
}

fn default_lyrics_url() -> String {
    "https://lrclib.net".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        retry_interval_ms: default_retry_interval_ms(),
        wait_budget_ms: default_wait_budget_ms(),
        settle_delay_ms: default_settle_delay_ms(),
        max_retries: default_max_retries(),
        volume: default_volume(),
    }
}

fn default_retry_interval_ms() -> u64 {
    5_000
}

fn default_wait_budget_ms() -> u64 {
    15_000
}

fn default_settle_delay_ms() -> u64 {
    1_500
}

fn default_max_retries() -> u32 {
    3
}

fn default_volume() -> u8 {
    80
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        state_file: default_state_file(),
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/melody-state.json")
}
