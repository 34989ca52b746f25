//! Console rendition of the panel view

use soundboard_core::{PlaylistId, SoundId};
use soundboard_playback::{PanelView, SlotState, TransportIndicators};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// [`PanelView`] that reports every repainted fragment through tracing
pub struct ConsoleView {
    alive: AtomicBool,
}

impl ConsoleView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            alive: AtomicBool::new(true),
        })
    }

    /// Detach the view; the sync loop exits on its next wakeup
    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl PanelView for ConsoleView {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn request_render(&self) {
        debug!("Panel rebuilt");
    }

    fn set_any_playing(&self, playing: bool) {
        if playing {
            info!("Soundboard playing");
        } else {
            info!("Soundboard idle");
        }
    }

    fn set_playlist_playing(&self, playlist_id: &PlaylistId, playing: bool) {
        debug!("Playlist {} playing: {}", playlist_id, playing);
    }

    fn set_slot_state(&self, sound_id: &SoundId, state: SlotState) {
        debug!(
            "Slot {} playing: {}, focused: {}",
            sound_id, state.playing, state.focused
        );
    }

    fn set_transport(&self, indicators: &TransportIndicators) {
        let Some(title) = &indicators.title else {
            info!("Nothing selected");
            return;
        };

        info!(
            "{} {}{} (volume {:.0}%)",
            if indicators.playing { "Playing" } else { "Paused" },
            title,
            if indicators.looping { " [loop]" } else { "" },
            indicators.volume * 100.0
        );
    }

    fn set_progress(&self, fraction: f64) {
        trace!("Progress {:.3}", fraction);
    }

    fn set_time_labels(&self, current: &str, duration: &str) {
        debug!("{} / {}", current, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_detaches_the_view() {
        let view = ConsoleView::new();
        assert!(view.is_alive());
        view.close();
        assert!(!view.is_alive());
    }
}
