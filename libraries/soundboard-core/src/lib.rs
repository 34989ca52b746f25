//! Soundboard Core
//!
//! Platform-agnostic types, collaborator traits, and error handling for the
//! soundboard panel.
//!
//! The panel never owns playback data. Playlists and sounds live in an
//! externally replicated document store; audio output belongs to the host.
//! This crate describes both collaborators as traits so the transport logic in
//! `soundboard-playback` can run against any host.
//!
//! # Architecture
//!
//! - **Domain Types**: `Playlist`, `Sound`, `SoundUpdate`, `DocumentEvent`, `SoundSelection`
//! - **Collaborator Traits**: `DocumentStore`, `MediaBackend`
//! - **Error Handling**: Unified `SoundboardError` and `Result` types
//! - **In-memory host**: `MemoryDocumentStore`, `MemoryMedia`
//!
//! # Example
//!
//! ```rust
//! use soundboard_core::{DocumentStore, MemoryDocumentStore, SoundUpdate};
//!
//! # async fn example() -> soundboard_core::Result<()> {
//! let store = MemoryDocumentStore::new();
//! let playlist = store.seed_playlist("Tavern", &["Fireplace", "Crowd"]);
//! let first = playlist.sounds[0].id.clone();
//!
//! store
//!     .update_sound(&playlist.id, &first, SoundUpdate::new().playing(true))
//!     .await?;
//! assert!(store.playlist(&playlist.id).unwrap().is_playing());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SoundboardError};
pub use memory::{MemoryDocumentStore, MemoryMedia, UpdateRecord};
pub use traits::{DocumentStore, MediaBackend};

pub use types::{
    clean_sound_name, DocumentEvent, NewPlaylist, NewSound, Playlist, PlaylistCategory,
    PlaylistId, Sound, SoundId, SoundSelection, SoundUpdate, SortUpdate, DEFAULT_SOUND_VOLUME,
    SORT_STEP,
};
