use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No user identity; run `melody login <id>` or pass --user")]
    NoUser,

    #[error(transparent)]
    Client(#[from] melody_client::ClientError),

    #[error(transparent)]
    Playback(#[from] melody_playback::PlaybackError),

    #[error(transparent)]
    Core(#[from] melody_core::CoreError),
}

pub type Result<T> = std::result::Result<T, CliError>;
