/// CLI error types
use soundboard_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Preference storage error: {0}")]
    Storage(#[from] soundboard_storage::StorageError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] soundboard_metadata::MetadataError),
}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
