/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Invalid preference key
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),
}

impl From<StorageError> for soundboard_core::SoundboardError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => soundboard_core::SoundboardError::Io(e),
            StorageError::Serialization(e) => soundboard_core::SoundboardError::Serialization(e),
            StorageError::InvalidKey(key) => {
                soundboard_core::SoundboardError::invalid_input(format!("preference key {key}"))
            }
        }
    }
}
