//! Error types for transport control

use soundboard_core::{PlaylistId, SoundId, SoundboardError};
use soundboard_metadata::MetadataError;
use soundboard_storage::StorageError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The document store rejected an update (replication failure)
    #[error(transparent)]
    Document(#[from] SoundboardError),

    /// Local preferences could not be persisted
    #[error(transparent)]
    Preferences(#[from] StorageError),

    /// Audio file discovery failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// No playlist is selected in the panel
    #[error("No playlist selected")]
    NoPlaylistSelected,

    /// Playlist does not exist (anymore)
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Sound does not exist in the current playlist
    #[error("Sound not found: {0}")]
    SoundNotFound(SoundId),

    /// Import found nothing to import
    #[error("No audio files found in {0}")]
    NoAudioFiles(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
