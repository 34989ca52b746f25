//! Panel view seam and incremental repaint
//!
//! The sync loop derives a [`Frame`] from the transport state on every tick
//! and notification; [`Renderer`] forwards to the [`PanelView`] only the
//! fragments that differ from the last painted frame.

use crate::types::{SlotState, TransportIndicators};
use soundboard_core::{PlaylistId, SoundId};
use std::collections::HashMap;

/// UI surface driven by the sync loop
///
/// Implementations are expected to be cheap; every call corresponds to one
/// fragment of the panel.
pub trait PanelView: Send + Sync {
    /// Whether the panel still exists; the sync loop stops once this is false
    fn is_alive(&self) -> bool;

    /// Rebuild the whole panel (playlists or sounds were created, deleted or reordered)
    fn request_render(&self);

    /// Header "something is playing" animation
    fn set_any_playing(&self, playing: bool);

    /// Playing indicator of a playlist in the sidebar
    fn set_playlist_playing(&self, playlist_id: &PlaylistId, playing: bool);

    /// Playing/focused highlighting of a slot
    fn set_slot_state(&self, sound_id: &SoundId, state: SlotState);

    /// Transport bar: title, play/pause icon, loop toggle, volume slider
    fn set_transport(&self, indicators: &TransportIndicators);

    /// Progress bar position in [0, 1]
    fn set_progress(&self, fraction: f64);

    /// Current time and duration labels
    fn set_time_labels(&self, current: &str, duration: &str);
}

/// Derived, visually observable playback state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Any sound of the current playlist is playing
    pub any_playing: bool,
    /// Playing state of every playlist, in display order
    pub playlists: Vec<(PlaylistId, bool)>,
    /// Slot highlighting of the current playlist, in order
    pub slots: Vec<(SoundId, SlotState)>,
    pub transport: TransportIndicators,
    /// Focused sound progress in [0, 1]
    pub progress: f64,
    pub current_label: String,
    pub duration_label: String,
}

/// Last-painted-frame cache
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<Frame>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last frame so the next paint repaints every fragment
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Paint the fragments of `frame` that changed.
    ///
    /// While `seeking`, the progress bar and time labels belong to the drag
    /// gesture and are left alone.
    pub fn paint(&mut self, frame: Frame, view: &dyn PanelView, seeking: bool) {
        let last = self.last.take();

        if last.as_ref().map(|l| l.any_playing) != Some(frame.any_playing) {
            view.set_any_playing(frame.any_playing);
        }

        let previous_playlists: HashMap<&PlaylistId, bool> = last
            .as_ref()
            .map(|l| l.playlists.iter().map(|(id, p)| (id, *p)).collect())
            .unwrap_or_default();
        for (id, playing) in &frame.playlists {
            if previous_playlists.get(id) != Some(playing) {
                view.set_playlist_playing(id, *playing);
            }
        }

        let previous_slots: HashMap<&SoundId, SlotState> = last
            .as_ref()
            .map(|l| l.slots.iter().map(|(id, s)| (id, *s)).collect())
            .unwrap_or_default();
        for (id, state) in &frame.slots {
            if previous_slots.get(id) != Some(state) {
                view.set_slot_state(id, *state);
            }
        }

        if last.as_ref().map(|l| &l.transport) != Some(&frame.transport) {
            view.set_transport(&frame.transport);
        }

        let mut painted = frame;
        if seeking {
            // Keep the cached values so the first frame after the drag repaints
            if let Some(last) = &last {
                painted.progress = last.progress;
                painted.current_label.clone_from(&last.current_label);
                painted.duration_label.clone_from(&last.duration_label);
            } else {
                painted.progress = f64::NAN;
                painted.current_label.clear();
                painted.duration_label.clear();
            }
        } else {
            if last.as_ref().map(|l| l.progress) != Some(painted.progress) {
                view.set_progress(painted.progress);
            }
            let labels_changed = last.as_ref().map_or(true, |l| {
                l.current_label != painted.current_label
                    || l.duration_label != painted.duration_label
            });
            if labels_changed {
                view.set_time_labels(&painted.current_label, &painted.duration_label);
            }
        }

        self.last = Some(painted);
    }
}
