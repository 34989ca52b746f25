/// Sound domain types
use crate::types::SoundId;
use serde::{Deserialize, Serialize};

/// Spacing between consecutive sort keys after a reorder.
///
/// Leaves room for future insertions without renumbering the whole playlist.
pub const SORT_STEP: i64 = 100_000;

/// Volume given to freshly imported sounds
pub const DEFAULT_SOUND_VOLUME: f32 = 0.5;

/// A playlist-owned sound record, as replicated by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    /// Unique sound identifier
    pub id: SoundId,

    /// Display name
    pub name: String,

    /// Audio file reference
    pub path: String,

    /// Whether the host is currently playing this sound
    pub playing: bool,

    /// Resume position in seconds.
    ///
    /// Authoritative only while `playing` is false.
    pub paused_time: f64,

    /// Replicated volume in [0, 1]
    pub volume: f32,

    /// Loop this sound instead of ending
    pub repeat: bool,

    /// Ordering key within the playlist
    pub sort: i64,
}

impl Sound {
    /// Create a stopped sound with default volume
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: SoundId::generate(),
            name: name.into(),
            path: path.into(),
            playing: false,
            paused_time: 0.0,
            volume: DEFAULT_SOUND_VOLUME,
            repeat: false,
            sort: 0,
        }
    }
}

/// Partial attribute update for a sound.
///
/// Fields left as `None` are untouched. The same type describes the set of
/// attributes that actually changed in a [`DocumentEvent::SoundUpdated`].
///
/// [`DocumentEvent::SoundUpdated`]: crate::DocumentEvent::SoundUpdated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
}

impl SoundUpdate {
    /// Empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the playing flag
    pub fn playing(mut self, playing: bool) -> Self {
        self.playing = Some(playing);
        self
    }

    /// Set the resume position (seconds)
    pub fn paused_time(mut self, seconds: f64) -> Self {
        self.paused_time = Some(seconds);
        self
    }

    /// Set the replicated volume (clamped to [0, 1])
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume.clamp(0.0, 1.0));
        self
    }

    /// Set the repeat flag
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.playing.is_none()
            && self.paused_time.is_none()
            && self.volume.is_none()
            && self.repeat.is_none()
    }

    /// Merge this update into `sound`.
    ///
    /// Returns only the attributes whose value actually changed, which is what
    /// the document store reports to observers.
    pub fn apply(&self, sound: &mut Sound) -> SoundUpdate {
        let mut changed = SoundUpdate::new();

        if let Some(name) = &self.name {
            if *name != sound.name {
                sound.name.clone_from(name);
                changed.name = Some(name.clone());
            }
        }
        if let Some(playing) = self.playing {
            if playing != sound.playing {
                sound.playing = playing;
                changed.playing = Some(playing);
            }
        }
        if let Some(paused_time) = self.paused_time {
            if paused_time != sound.paused_time {
                sound.paused_time = paused_time;
                changed.paused_time = Some(paused_time);
            }
        }
        if let Some(volume) = self.volume {
            if volume != sound.volume {
                sound.volume = volume;
                changed.volume = Some(volume);
            }
        }
        if let Some(repeat) = self.repeat {
            if repeat != sound.repeat {
                sound.repeat = repeat;
                changed.repeat = Some(repeat);
            }
        }

        changed
    }
}

/// Data for creating a sound inside a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSound {
    pub name: String,
    pub path: String,
    pub volume: f32,
}

impl NewSound {
    /// Sound data with the default import volume
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            volume: DEFAULT_SOUND_VOLUME,
        }
    }

    /// Override the volume (clamped to [0, 1])
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}

/// New sort key for one sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortUpdate {
    pub id: SoundId,
    pub sort: i64,
}
