//! Media backend backed by probed file durations

use crate::probe::probe_duration;
use soundboard_core::{MediaBackend, Sound, SoundId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// [`MediaBackend`] that probes each sound's file once for its duration.
///
/// Relative sound paths are resolved against an optional root. Files that
/// cannot be probed report an unknown duration. Output gains are only
/// recorded; decoding and mixing belong to the host.
#[derive(Default)]
pub struct ProbedMedia {
    root: Option<PathBuf>,
    durations: Mutex<HashMap<String, Option<f64>>>,
    gains: Mutex<HashMap<SoundId, f32>>,
}

impl ProbedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sound paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }

    /// Last gain applied to a sound's local output
    pub fn output_volume(&self, sound_id: &SoundId) -> Option<f32> {
        self.gains
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(sound_id)
            .copied()
    }
}

impl MediaBackend for ProbedMedia {
    fn duration(&self, sound: &Sound) -> Option<f64> {
        let mut durations = self.durations.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(known) = durations.get(&sound.path) {
            return *known;
        }

        let probed = match probe_duration(&self.resolve(&sound.path)) {
            Ok(seconds) if seconds > 0.0 => Some(seconds),
            Ok(_) => None,
            Err(e) => {
                warn!("Cannot determine duration of '{}': {}", sound.path, e);
                None
            }
        };
        durations.insert(sound.path.clone(), probed);
        probed
    }

    fn set_output_volume(&self, sound_id: &SoundId, gain: f32) {
        let previous = self
            .gains
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(sound_id.clone(), gain);

        if previous != Some(gain) {
            debug!("Output gain for {} set to {:.2}", sound_id, gain);
        }
    }
}
