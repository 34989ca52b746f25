//! Simulated audio host
//!
//! Stands in for the host platform's audio primitive. A playing sound reaches
//! its natural end once its remaining duration has elapsed, and the host
//! writes `playing: false` back to the document like a real client would.
//! Looping sounds restart instead of ending.

use soundboard_core::{
    DocumentEvent, DocumentStore, MediaBackend, MemoryDocumentStore, PlaylistId, Sound, SoundId,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

struct Deadline {
    playlist_id: PlaylistId,
    at: Instant,
}

/// Ends playing sounds after their probed duration
pub struct HostSimulator {
    documents: Arc<MemoryDocumentStore>,
    media: Arc<dyn MediaBackend>,
    deadlines: HashMap<SoundId, Deadline>,
}

impl HostSimulator {
    pub fn new(documents: Arc<MemoryDocumentStore>, media: Arc<dyn MediaBackend>) -> Self {
        Self {
            documents,
            media,
            deadlines: HashMap::new(),
        }
    }

    /// Run the simulator on the current runtime until the task is aborted
    pub fn spawn(self) -> JoinHandle<()> {
        let events = self.documents.subscribe();
        tokio::spawn(self.run(events))
    }

    async fn run(mut self, mut events: broadcast::Receiver<DocumentEvent>) {
        self.resync();

        loop {
            let next = self
                .deadlines
                .iter()
                .min_by_key(|(_, deadline)| deadline.at)
                .map(|(id, deadline)| (id.clone(), deadline.at));
            let wake = next.as_ref().map(|(_, at)| *at);

            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => self.on_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Host simulator missed {} notifications, resyncing", skipped);
                        self.resync();
                    }
                    Err(RecvError::Closed) => break,
                },
                () = sleep_until(wake) => {
                    if let Some((sound_id, _)) = next {
                        self.reach_end(&sound_id);
                    }
                }
            }
        }

        debug!("Host simulator stopped");
    }

    fn on_event(&mut self, event: &DocumentEvent) {
        match event {
            DocumentEvent::SoundUpdated {
                playlist_id,
                sound,
                changes,
            } => {
                if changes.playing.is_some() || changes.paused_time.is_some() {
                    self.schedule(playlist_id, sound);
                }
            }
            DocumentEvent::SoundsDeleted { sound_ids, .. } => {
                for id in sound_ids {
                    self.deadlines.remove(id);
                }
            }
            DocumentEvent::PlaylistDeleted { playlist_id } => {
                self.deadlines.retain(|_, d| &d.playlist_id != playlist_id);
            }
            _ => {}
        }
    }

    /// Rebuild every deadline from the document cache
    fn resync(&mut self) {
        self.deadlines.clear();
        for playlist in self.documents.playlists() {
            for sound in playlist.sounds.iter().filter(|s| s.playing) {
                self.schedule(&playlist.id, sound);
            }
        }
    }

    fn schedule(&mut self, playlist_id: &PlaylistId, sound: &Sound) {
        if !sound.playing {
            self.deadlines.remove(&sound.id);
            return;
        }

        let Some(duration) = self.media.duration(sound) else {
            debug!("Duration of {} unknown, it will play until stopped", sound.id);
            self.deadlines.remove(&sound.id);
            return;
        };

        let remaining = (duration - sound.paused_time).max(0.0);
        self.deadlines.insert(
            sound.id.clone(),
            Deadline {
                playlist_id: playlist_id.clone(),
                at: Instant::now() + Duration::from_secs_f64(remaining),
            },
        );
    }

    fn reach_end(&mut self, sound_id: &SoundId) {
        let Some(deadline) = self.deadlines.remove(sound_id) else {
            return;
        };
        let Some(sound) = self.documents.sound(&deadline.playlist_id, sound_id) else {
            return;
        };
        if !sound.playing {
            return;
        }

        if sound.repeat {
            debug!("Looping {}", sound.name);
            let restarted = Sound {
                paused_time: 0.0,
                ..sound
            };
            self.schedule(&deadline.playlist_id, &restarted);
            return;
        }

        info!("Finished {}", sound.name);
        if let Err(e) = self.documents.finish_sound(&deadline.playlist_id, sound_id) {
            warn!("Failed to report end of {}: {}", sound_id, e);
        }
    }
}

async fn sleep_until(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
