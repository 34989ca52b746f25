//! Soundboard Storage
//!
//! Client-local preference storage for the soundboard panel.
//!
//! Two small keyed maps are kept per client and never replicated:
//! - **Slot images**: `(playlist, sound) -> image path`
//! - **Playlist volumes**: `playlist -> multiplier in [0, 1]`
//!
//! Each map is persisted as its own JSON document through a
//! [`PreferenceBackend`], mirroring how a browser client keeps them under two
//! independent local-storage keys.
//!
//! # Example
//!
//! ```rust
//! use soundboard_core::{PlaylistId, SoundId};
//! use soundboard_storage::{MemoryBackend, PreferenceStore};
//!
//! # fn example() -> soundboard_storage::Result<()> {
//! let prefs = PreferenceStore::open(MemoryBackend::new())?;
//! let playlist = PlaylistId::new("tavern");
//!
//! prefs.set_slot_image(&playlist, &SoundId::new("fire"), "icons/fire.webp")?;
//! prefs.set_playlist_volume(&playlist, 0.4)?;
//! assert_eq!(prefs.playlist_volume(&playlist), 0.4);
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod preferences;

pub use backend::{JsonDirectoryBackend, MemoryBackend, PreferenceBackend};
pub use error::{Result, StorageError};
pub use preferences::{PreferenceStore, KEY_PLAYLIST_VOLUMES, KEY_SLOT_IMAGES};
