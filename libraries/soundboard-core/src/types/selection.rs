/// Picker results, resolved once at the picker boundary
use crate::types::{PlaylistId, SoundId};
use serde::{Deserialize, Serialize};

/// What the user picked to fill a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SoundSelection {
    /// A file picked from disk that is not in any playlist yet
    Unsaved { path: String, name: String },

    /// An existing replicated sound (possibly from another playlist)
    Replicated {
        id: SoundId,
        playlist_id: PlaylistId,
    },
}

impl SoundSelection {
    /// Selection for a file path, named after the file
    pub fn unsaved(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = clean_sound_name(&path);
        Self::Unsaved { path, name }
    }
}

/// Derive a display name from a file path.
///
/// Takes the last path segment, percent-decodes it, and drops the extension.
/// Undecodable segments are used as-is.
pub fn clean_sound_name(path: &str) -> String {
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    match decoded.rfind('.') {
        Some(dot) if dot > 0 => decoded[..dot].to_string(),
        _ => decoded,
    }
}
