/// Playlist domain types
use crate::types::{PlaylistId, Sound, SoundId};
use serde::{Deserialize, Serialize};

/// Single-valued category tag, used only for icon selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistCategory {
    #[default]
    Music,
    Environment,
    Interface,
}

impl PlaylistCategory {
    /// All categories in menu order
    pub const ALL: [PlaylistCategory; 3] = [
        PlaylistCategory::Music,
        PlaylistCategory::Environment,
        PlaylistCategory::Interface,
    ];

    /// Display icon
    pub fn icon(&self) -> &'static str {
        match self {
            PlaylistCategory::Music => "🎵",
            PlaylistCategory::Environment => "🌲",
            PlaylistCategory::Interface => "🔔",
        }
    }

    /// Stable lowercase key
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistCategory::Music => "music",
            PlaylistCategory::Environment => "environment",
            PlaylistCategory::Interface => "interface",
        }
    }
}

/// Playlist with its sounds
///
/// `sounds` is kept in ascending `sort` order by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Display name
    pub name: String,

    /// Category tag
    #[serde(default)]
    pub category: PlaylistCategory,

    /// Sounds in playback order
    pub sounds: Vec<Sound>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            category: PlaylistCategory::default(),
            sounds: Vec::new(),
        }
    }

    /// Look up a sound by id
    pub fn sound(&self, id: &SoundId) -> Option<&Sound> {
        self.sounds.iter().find(|s| &s.id == id)
    }

    /// Position of a sound in playback order
    pub fn position(&self, id: &SoundId) -> Option<usize> {
        self.sounds.iter().position(|s| &s.id == id)
    }

    /// Whether any sound in this playlist is playing
    pub fn is_playing(&self) -> bool {
        self.sounds.iter().any(|s| s.playing)
    }
}

/// Data for creating a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylist {
    pub name: String,
    #[serde(default)]
    pub category: PlaylistCategory,
}

impl NewPlaylist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: PlaylistCategory::Music,
        }
    }
}
