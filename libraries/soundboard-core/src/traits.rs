/// Collaborator traits for the soundboard
use crate::error::Result;
use crate::types::{
    DocumentEvent, NewPlaylist, NewSound, Playlist, PlaylistCategory, PlaylistId, Sound, SoundId,
    SoundUpdate, SortUpdate,
};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Replicated document store owned by the host platform
///
/// Reads come from the host's local cache and are synchronous. Writes are
/// network operations: they are replicated to every participant and fire a
/// [`DocumentEvent`] on every subscription, the originator's included.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get a playlist (with its sounds in order) from the local cache
    fn playlist(&self, id: &PlaylistId) -> Option<Playlist>;

    /// All playlists in display order
    fn playlists(&self) -> Vec<Playlist>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<DocumentEvent>;

    // Sound operations

    /// Merge a partial update into a sound
    async fn update_sound(
        &self,
        playlist_id: &PlaylistId,
        sound_id: &SoundId,
        update: SoundUpdate,
    ) -> Result<()>;

    /// Append sounds to a playlist, returning the created records
    async fn create_sounds(
        &self,
        playlist_id: &PlaylistId,
        sounds: Vec<NewSound>,
    ) -> Result<Vec<Sound>>;

    /// Delete sounds from a playlist
    async fn delete_sounds(&self, playlist_id: &PlaylistId, ids: &[SoundId]) -> Result<()>;

    /// Rewrite sort keys (used for drag-reordering)
    async fn update_sort(&self, playlist_id: &PlaylistId, updates: Vec<SortUpdate>) -> Result<()>;

    // Playlist operations

    /// Create an empty playlist
    async fn create_playlist(&self, playlist: NewPlaylist) -> Result<Playlist>;

    /// Delete a playlist and all its sounds
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;

    /// Change a playlist's category tag
    async fn set_category(&self, id: &PlaylistId, category: PlaylistCategory) -> Result<()>;
}

/// Local audio primitive driven by the host
///
/// Decoding and mixing happen elsewhere; the panel only needs media metadata
/// and a way to set the locally audible gain.
pub trait MediaBackend: Send + Sync {
    /// Decoded duration in seconds, `None` until the media has buffered
    fn duration(&self, sound: &Sound) -> Option<f64>;

    /// Set the gain of this client's audio output for a sound.
    ///
    /// Never replicated.
    fn set_output_volume(&self, sound_id: &SoundId, gain: f32);
}
