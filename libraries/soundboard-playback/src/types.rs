//! Core types for transport control

use serde::{Deserialize, Serialize};
use soundboard_core::{PlaylistId, SoundId, DEFAULT_SOUND_VOLUME};

/// Configuration for the transport controller and sync loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Sync loop period in milliseconds (default: 100)
    pub poll_interval_ms: u64,

    /// Distance from end-of-track that a seek may land on, in seconds (default: 0.5)
    pub seek_end_margin: f64,

    /// Lifetime of unconsumed manual-stop markers in milliseconds (default: 2000)
    pub manual_stop_ttl_ms: u64,

    /// Replicated volume given to newly added sounds (default: 0.5)
    pub default_sound_volume: f32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            seek_end_margin: 0.5,
            manual_stop_ttl_ms: 2000,
            default_sound_volume: DEFAULT_SOUND_VOLUME,
        }
    }
}

/// Which sound the transport controls target
///
/// Only meaningful within the current playlist; cleared whenever the
/// playlist changes or the sound disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFocus {
    pub playlist_id: PlaylistId,
    pub sound_id: Option<SoundId>,
}

/// UI session state kept per playlist for the lifetime of the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaylistSessionState {
    /// Whether the playlist's volume slider is unfolded
    pub volume_expanded: bool,
}

/// Transport bar indicators for the focused sound
#[derive(Debug, Clone, PartialEq)]
pub struct TransportIndicators {
    /// Focused sound name, `None` when nothing is focused
    pub title: Option<String>,
    pub playing: bool,
    pub looping: bool,
    /// Focused sound's replicated volume
    pub volume: f32,
}

impl Default for TransportIndicators {
    fn default() -> Self {
        Self {
            title: None,
            playing: false,
            looping: false,
            volume: DEFAULT_SOUND_VOLUME,
        }
    }
}

/// Highlight state of one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub playing: bool,
    pub focused: bool,
}

/// One slot of the current playlist, for a full render
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub index: usize,
    pub id: SoundId,
    pub name: String,
    pub playing: bool,
    pub active: bool,
    pub image: Option<String>,
}

/// One entry of the playlist sidebar, for a full render
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistItem {
    pub id: PlaylistId,
    pub name: String,
    pub selected: bool,
    pub playing: bool,
    pub icon: &'static str,
    /// Local volume multiplier
    pub volume: f32,
    pub volume_expanded: bool,
}

/// Sounds of one playlist matching a picker search
#[derive(Debug, Clone, PartialEq)]
pub struct PickerGroup {
    pub playlist_id: PlaylistId,
    pub playlist_name: String,
    pub sounds: Vec<PickerEntry>,
}

/// A sound offered by the picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerEntry {
    pub id: SoundId,
    pub name: String,
    pub path: String,
}

/// Visual-only seek position while a drag is in progress
#[derive(Debug, Clone, PartialEq)]
pub struct SeekPreview {
    /// Clamped position in [0, 1]
    pub fraction: f64,
    /// Formatted time at that position
    pub label: String,
}
