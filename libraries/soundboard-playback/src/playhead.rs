//! Local playhead estimation
//!
//! Notifications only carry discrete attribute changes, so the elapsed time
//! of a playing sound is tracked locally: each `playing: true` transition
//! anchors the playhead at the sound's resume position, and the current time
//! is that offset plus wall-clock time since the anchor.

use soundboard_core::{Sound, SoundId};
use std::collections::HashMap;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Anchor {
    started: Instant,
    offset: f64,
}

#[derive(Debug, Default)]
pub(crate) struct Playhead {
    anchors: HashMap<SoundId, Anchor>,
}

impl Playhead {
    /// Re-anchor on a `playing` transition observed in a notification
    pub(crate) fn on_playing_changed(&mut self, sound: &Sound, now: Instant) {
        if sound.playing {
            self.anchors.insert(
                sound.id.clone(),
                Anchor {
                    started: now,
                    offset: sound.paused_time,
                },
            );
        } else {
            self.anchors.remove(&sound.id);
        }
    }

    /// Anchor a playing sound whose start was not observed
    pub(crate) fn ensure_anchor(&mut self, sound: &Sound, now: Instant) {
        if sound.playing {
            self.anchors.entry(sound.id.clone()).or_insert(Anchor {
                started: now,
                offset: sound.paused_time,
            });
        }
    }

    pub(crate) fn forget(&mut self, sound_id: &SoundId) {
        self.anchors.remove(sound_id);
    }

    /// Keep only anchors for which `keep` holds
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&SoundId) -> bool) {
        self.anchors.retain(|id, _| keep(id));
    }

    /// Current position of `sound` in seconds.
    ///
    /// While not playing the resume position is authoritative. While playing
    /// it is never read; the estimate is clamped to a known duration.
    pub(crate) fn current_time(&self, sound: &Sound, duration: Option<f64>, now: Instant) -> f64 {
        if !sound.playing {
            return sound.paused_time.max(0.0);
        }

        let Some(anchor) = self.anchors.get(&sound.id) else {
            return sound.paused_time.max(0.0);
        };

        let elapsed = anchor.offset + now.duration_since(anchor.started).as_secs_f64();
        match duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => elapsed.min(duration),
            _ => elapsed,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_anchored(&self, sound_id: &SoundId) -> bool {
        self.anchors.contains_key(sound_id)
    }
}
