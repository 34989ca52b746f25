/// Core error types for the soundboard
use crate::types::{PlaylistId, SoundId};
use thiserror::Error;

/// Result type alias using `SoundboardError`
pub type Result<T> = std::result::Result<T, SoundboardError>;

/// Core error type for the soundboard
#[derive(Error, Debug)]
pub enum SoundboardError {
    /// The document store rejected an operation (network or validation)
    #[error("Document store error: {0}")]
    Document(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Sound not found in the given playlist
    #[error("Sound not found: {sound_id} (playlist {playlist_id})")]
    SoundNotFound {
        playlist_id: PlaylistId,
        sound_id: SoundId,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SoundboardError {
    /// Create a document store error
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Create a sound not found error
    pub fn sound_not_found(playlist_id: &PlaylistId, sound_id: &SoundId) -> Self {
        Self::SoundNotFound {
            playlist_id: playlist_id.clone(),
            sound_id: sound_id.clone(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
