//! In-memory document store and media backend
//!
//! Behaves like a single-participant host: every write is applied to the
//! local cache and broadcast to all subscribers before the call returns.
//! Used by tests and by the headless CLI host.

use crate::error::{Result, SoundboardError};
use crate::traits::{DocumentStore, MediaBackend};
use crate::types::{
    DocumentEvent, NewPlaylist, NewSound, Playlist, PlaylistCategory, PlaylistId, Sound, SoundId,
    SoundUpdate, SortUpdate, SORT_STEP,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Capacity of the notification channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A sound update as received by the store
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecord {
    pub playlist_id: PlaylistId,
    pub sound_id: SoundId,
    pub update: SoundUpdate,
}

#[derive(Default)]
struct Inner {
    playlists: Vec<Playlist>,
    /// Number of upcoming writes that should be rejected
    failures: usize,
    updates: Vec<UpdateRecord>,
}

impl Inner {
    fn playlist_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| SoundboardError::PlaylistNotFound(id.clone()))
    }

    fn take_failure(&mut self) -> Result<()> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SoundboardError::document("simulated replication failure"));
        }
        Ok(())
    }
}

/// In-memory replicated document store
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
    events: broadcast::Sender<DocumentEvent>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: DocumentEvent) {
        // No receivers is fine: nobody is observing yet
        let _ = self.events.send(event);
    }

    /// Insert a playlist with one sound per name, without notifications.
    ///
    /// Sound paths are derived from the names (`sounds/<name>.ogg`).
    pub fn seed_playlist(&self, name: &str, sound_names: &[&str]) -> Playlist {
        let mut playlist = Playlist::new(name);
        for (i, sound_name) in sound_names.iter().enumerate() {
            let mut sound = Sound::new(*sound_name, format!("sounds/{sound_name}.ogg"));
            sound.sort = (i as i64 + 1) * SORT_STEP;
            playlist.sounds.push(sound);
        }

        self.lock().playlists.push(playlist.clone());
        playlist
    }

    /// Reject the next `count` writes with a replication error
    pub fn fail_next_writes(&self, count: usize) {
        self.lock().failures = count;
    }

    /// Every sound update received so far, in order (rejected ones excluded)
    pub fn update_log(&self) -> Vec<UpdateRecord> {
        self.lock().updates.clone()
    }

    /// Forget recorded sound updates
    pub fn clear_update_log(&self) {
        self.lock().updates.clear();
    }

    /// Current state of a sound
    pub fn sound(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> Option<Sound> {
        self.playlist(playlist_id)
            .and_then(|p| p.sound(sound_id).cloned())
    }

    /// Simulate the host reaching the end of a non-looping sound.
    ///
    /// Sets `playing: false` and rewinds, exactly as the host's audio primitive
    /// would, and notifies observers.
    pub fn finish_sound(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> Result<()> {
        self.apply_update(
            playlist_id,
            sound_id,
            SoundUpdate::new().playing(false).paused_time(0.0),
            false,
        )
    }

    fn apply_update(
        &self,
        playlist_id: &PlaylistId,
        sound_id: &SoundId,
        update: SoundUpdate,
        record: bool,
    ) -> Result<()> {
        let event = {
            let mut inner = self.lock();
            if record {
                inner.take_failure()?;
            }

            let playlist = inner.playlist_mut(playlist_id)?;
            let sound = playlist
                .sounds
                .iter_mut()
                .find(|s| &s.id == sound_id)
                .ok_or_else(|| SoundboardError::sound_not_found(playlist_id, sound_id))?;

            let changes = update.apply(sound);
            let snapshot = sound.clone();

            if record {
                inner.updates.push(UpdateRecord {
                    playlist_id: playlist_id.clone(),
                    sound_id: sound_id.clone(),
                    update,
                });
            }

            (!changes.is_empty()).then(|| DocumentEvent::SoundUpdated {
                playlist_id: playlist_id.clone(),
                sound: snapshot,
                changes,
            })
        };

        if let Some(event) = event {
            self.emit(event);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn playlist(&self, id: &PlaylistId) -> Option<Playlist> {
        self.lock().playlists.iter().find(|p| &p.id == id).cloned()
    }

    fn playlists(&self) -> Vec<Playlist> {
        self.lock().playlists.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    async fn update_sound(
        &self,
        playlist_id: &PlaylistId,
        sound_id: &SoundId,
        update: SoundUpdate,
    ) -> Result<()> {
        self.apply_update(playlist_id, sound_id, update, true)
    }

    async fn create_sounds(
        &self,
        playlist_id: &PlaylistId,
        sounds: Vec<NewSound>,
    ) -> Result<Vec<Sound>> {
        let created = {
            let mut inner = self.lock();
            inner.take_failure()?;

            let playlist = inner.playlist_mut(playlist_id)?;
            let mut next_sort = playlist.sounds.iter().map(|s| s.sort).max().unwrap_or(0);

            let mut created = Vec::with_capacity(sounds.len());
            for data in sounds {
                next_sort += SORT_STEP;
                let mut sound = Sound::new(data.name, data.path);
                sound.volume = data.volume.clamp(0.0, 1.0);
                sound.sort = next_sort;
                playlist.sounds.push(sound.clone());
                created.push(sound);
            }
            created
        };

        self.emit(DocumentEvent::SoundsCreated {
            playlist_id: playlist_id.clone(),
            sound_ids: created.iter().map(|s| s.id.clone()).collect(),
        });
        Ok(created)
    }

    async fn delete_sounds(&self, playlist_id: &PlaylistId, ids: &[SoundId]) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.take_failure()?;
            let playlist = inner.playlist_mut(playlist_id)?;
            playlist.sounds.retain(|s| !ids.contains(&s.id));
        }

        self.emit(DocumentEvent::SoundsDeleted {
            playlist_id: playlist_id.clone(),
            sound_ids: ids.to_vec(),
        });
        Ok(())
    }

    async fn update_sort(&self, playlist_id: &PlaylistId, updates: Vec<SortUpdate>) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.take_failure()?;

            let playlist = inner.playlist_mut(playlist_id)?;
            let sorts: HashMap<&SoundId, i64> = updates.iter().map(|u| (&u.id, u.sort)).collect();
            for sound in &mut playlist.sounds {
                if let Some(sort) = sorts.get(&sound.id) {
                    sound.sort = *sort;
                }
            }
            playlist.sounds.sort_by_key(|s| s.sort);
        }

        self.emit(DocumentEvent::PlaylistUpdated {
            playlist_id: playlist_id.clone(),
        });
        Ok(())
    }

    async fn create_playlist(&self, data: NewPlaylist) -> Result<Playlist> {
        let mut playlist = Playlist::new(data.name);
        playlist.category = data.category;

        {
            let mut inner = self.lock();
            inner.take_failure()?;
            inner.playlists.push(playlist.clone());
        }

        self.emit(DocumentEvent::PlaylistCreated {
            playlist_id: playlist.id.clone(),
        });
        Ok(playlist)
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.take_failure()?;
            let before = inner.playlists.len();
            inner.playlists.retain(|p| &p.id != id);
            if inner.playlists.len() == before {
                return Err(SoundboardError::PlaylistNotFound(id.clone()));
            }
        }

        self.emit(DocumentEvent::PlaylistDeleted {
            playlist_id: id.clone(),
        });
        Ok(())
    }

    async fn set_category(&self, id: &PlaylistId, category: PlaylistCategory) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.take_failure()?;
            inner.playlist_mut(id)?.category = category;
        }

        self.emit(DocumentEvent::PlaylistUpdated {
            playlist_id: id.clone(),
        });
        Ok(())
    }
}

/// In-memory media backend
///
/// Durations are registered explicitly; output gains are recorded so callers
/// can observe what this client would hear.
#[derive(Default)]
pub struct MemoryMedia {
    durations: Mutex<HashMap<SoundId, f64>>,
    gains: Mutex<HashMap<SoundId, f32>>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a sound's media as decoded with the given duration (seconds)
    pub fn set_duration(&self, sound_id: &SoundId, seconds: f64) {
        self.durations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(sound_id.clone(), seconds);
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

impl MediaBackend for MemoryMedia {
    fn duration(&self, sound: &Sound) -> Option<f64> {
        self.durations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&sound.id)
            .copied()
    }

    fn set_output_volume(&self, sound_id: &SoundId, gain: f32) {
        self.gains
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(sound_id.clone(), gain);
    }
}
