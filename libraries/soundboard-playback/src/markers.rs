//! Manual-stop markers
//!
//! A marker says "the next `playing: false` notification for this sound was
//! caused by a local pause, stop or seek". The notification handler consumes
//! it to tell a manual stop apart from a natural end of track. Markers that
//! are never consumed expire after a bounded lifetime.

use soundboard_core::SoundId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub(crate) struct ManualStopMarkers {
    entries: HashMap<SoundId, Instant>,
    ttl: Duration,
}

impl ManualStopMarkers {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub(crate) fn mark(&mut self, sound_id: &SoundId, now: Instant) {
        self.entries.insert(sound_id.clone(), now);
    }

    /// Remove the marker; true if one was present and still fresh
    pub(crate) fn consume(&mut self, sound_id: &SoundId, now: Instant) -> bool {
        self.entries
            .remove(sound_id)
            .is_some_and(|marked| now.duration_since(marked) <= self.ttl)
    }

    pub(crate) fn unmark(&mut self, sound_id: &SoundId) {
        self.entries.remove(sound_id);
    }

    /// Drop expired markers, returning how many were dropped
    pub(crate) fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, marked| now.duration_since(*marked) <= ttl);
        before - self.entries.len()
    }

    pub(crate) fn contains(&self, sound_id: &SoundId) -> bool {
        self.entries.contains_key(sound_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
