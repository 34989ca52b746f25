//! Change notifications pushed by the document store
//!
//! Every participant's change is delivered to every observer, including the
//! participant that issued it.

use crate::types::{PlaylistId, Sound, SoundId, SoundUpdate};
use serde::{Deserialize, Serialize};

/// Notification delivered by a [`DocumentStore`](crate::DocumentStore) subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A sound's replicated attributes changed
    SoundUpdated {
        /// Owning playlist
        playlist_id: PlaylistId,
        /// Sound state after the update
        sound: Sound,
        /// Attributes that actually changed
        changes: SoundUpdate,
    },

    /// Sounds were added to a playlist
    SoundsCreated {
        playlist_id: PlaylistId,
        sound_ids: Vec<SoundId>,
    },

    /// Sounds were removed from a playlist
    SoundsDeleted {
        playlist_id: PlaylistId,
        sound_ids: Vec<SoundId>,
    },

    /// A playlist was created
    PlaylistCreated { playlist_id: PlaylistId },

    /// Playlist-level attributes (name, category, sound order) changed
    PlaylistUpdated { playlist_id: PlaylistId },

    /// A playlist was deleted
    PlaylistDeleted { playlist_id: PlaylistId },
}

impl DocumentEvent {
    /// Coarse notifications invalidate the whole panel instead of a fragment
    pub fn requires_full_render(&self) -> bool {
        !matches!(self, DocumentEvent::SoundUpdated { .. })
    }

    /// Playlist the notification refers to
    pub fn playlist_id(&self) -> &PlaylistId {
        match self {
            DocumentEvent::SoundUpdated { playlist_id, .. }
            | DocumentEvent::SoundsCreated { playlist_id, .. }
            | DocumentEvent::SoundsDeleted { playlist_id, .. }
            | DocumentEvent::PlaylistCreated { playlist_id }
            | DocumentEvent::PlaylistUpdated { playlist_id }
            | DocumentEvent::PlaylistDeleted { playlist_id } => playlist_id,
        }
    }
}
