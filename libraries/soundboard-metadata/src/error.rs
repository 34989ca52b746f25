/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File or folder not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Path is not usable for the requested operation
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for soundboard_core::SoundboardError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Io(e) => soundboard_core::SoundboardError::Io(e),
            other => soundboard_core::SoundboardError::invalid_input(other.to_string()),
        }
    }
}
