//! Local preference store
//!
//! Slot images and playlist volume multipliers are purely local rendering and
//! mixing hints: other participants never see them. Every mutation is
//! written through to the backend immediately.

use crate::backend::PreferenceBackend;
use crate::error::Result;
use soundboard_core::{PlaylistId, SoundId};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Backend key for the slot image map
pub const KEY_SLOT_IMAGES: &str = "slot-images";

/// Backend key for the playlist volume map
pub const KEY_PLAYLIST_VOLUMES: &str = "playlist-volumes";

/// Multiplier used when a playlist has no stored volume
const DEFAULT_PLAYLIST_VOLUME: f32 = 1.0;

type SlotImages = BTreeMap<PlaylistId, BTreeMap<SoundId, String>>;
type PlaylistVolumes = BTreeMap<PlaylistId, f32>;

#[derive(Default)]
struct Maps {
    images: SlotImages,
    volumes: PlaylistVolumes,
}

/// Client-local preference store
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    maps: Mutex<Maps>,
}

impl PreferenceStore {
    /// Load both maps from `backend`.
    ///
    /// A missing or unreadable document starts that map empty; backend I/O
    /// failures are returned.
    pub fn open(backend: impl PreferenceBackend + 'static) -> Result<Self> {
        let images = load_map(&backend, KEY_SLOT_IMAGES)?;
        let volumes = load_map(&backend, KEY_PLAYLIST_VOLUMES)?;

        Ok(Self {
            backend: Box::new(backend),
            maps: Mutex::new(Maps { images, volumes }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Maps> {
        self.maps.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save_images(&self, images: &SlotImages) -> Result<()> {
        let json = serde_json::to_string(images)?;
        self.backend.save(KEY_SLOT_IMAGES, &json)
    }

    fn save_volumes(&self, volumes: &PlaylistVolumes) -> Result<()> {
        let json = serde_json::to_string(volumes)?;
        self.backend.save(KEY_PLAYLIST_VOLUMES, &json)
    }

    // ===== Slot images =====

    /// Image shown on a sound's slot
    pub fn slot_image(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> Option<String> {
        self.lock()
            .images
            .get(playlist_id)
            .and_then(|sounds| sounds.get(sound_id))
            .cloned()
    }

    /// Set the image shown on a sound's slot
    pub fn set_slot_image(
        &self,
        playlist_id: &PlaylistId,
        sound_id: &SoundId,
        path: impl Into<String>,
    ) -> Result<()> {
        let mut maps = self.lock();
        maps.images
            .entry(playlist_id.clone())
            .or_default()
            .insert(sound_id.clone(), path.into());
        self.save_images(&maps.images)
    }

    /// Remove a slot's image; returns whether one was set
    pub fn remove_slot_image(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> Result<bool> {
        let mut maps = self.lock();
        let removed = maps
            .images
            .get_mut(playlist_id)
            .and_then(|sounds| sounds.remove(sound_id))
            .is_some();

        if removed {
            if maps.images.get(playlist_id).is_some_and(BTreeMap::is_empty) {
                maps.images.remove(playlist_id);
            }
            self.save_images(&maps.images)?;
        }
        Ok(removed)
    }

    // ===== Playlist volumes =====

    /// Local volume multiplier for a playlist (1.0 when unset)
    pub fn playlist_volume(&self, playlist_id: &PlaylistId) -> f32 {
        self.lock()
            .volumes
            .get(playlist_id)
            .copied()
            .unwrap_or(DEFAULT_PLAYLIST_VOLUME)
    }

    /// Set a playlist's local volume multiplier (clamped to [0, 1])
    pub fn set_playlist_volume(&self, playlist_id: &PlaylistId, volume: f32) -> Result<()> {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_PLAYLIST_VOLUME
        };

        let mut maps = self.lock();
        maps.volumes.insert(playlist_id.clone(), volume);
        self.save_volumes(&maps.volumes)
    }

    // ===== Pruning =====

    /// Drop every local entry belonging to a deleted playlist
    pub fn purge_playlist(&self, playlist_id: &PlaylistId) -> Result<()> {
        let mut maps = self.lock();
        if maps.images.remove(playlist_id).is_some() {
            self.save_images(&maps.images)?;
        }
        if maps.volumes.remove(playlist_id).is_some() {
            self.save_volumes(&maps.volumes)?;
        }
        debug!("Purged local preferences for playlist {}", playlist_id);
        Ok(())
    }

    /// Drop the slot image of a deleted sound
    pub fn purge_sound(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> Result<()> {
        self.remove_slot_image(playlist_id, sound_id).map(|_| ())
    }

    /// Whether any local entry exists for a playlist
    pub fn has_entries(&self, playlist_id: &PlaylistId) -> bool {
        let maps = self.lock();
        maps.images.contains_key(playlist_id) || maps.volumes.contains_key(playlist_id)
    }
}

fn load_map<T>(backend: &dyn PreferenceBackend, key: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(raw) = backend.load(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(map) => Ok(map),
        Err(e) => {
            warn!("Discarding unreadable preference document '{}': {}", key, e);
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn ids() -> (PlaylistId, SoundId) {
        (PlaylistId::new("tavern"), SoundId::new("fire"))
    }

    #[test]
    fn playlist_volume_defaults_to_unity() {
        let prefs = PreferenceStore::open(MemoryBackend::new()).unwrap();
        assert_eq!(prefs.playlist_volume(&PlaylistId::new("x")), 1.0);
    }

    #[test]
    fn playlist_volume_is_clamped() {
        let prefs = PreferenceStore::open(MemoryBackend::new()).unwrap();
        let (playlist, _) = ids();

        prefs.set_playlist_volume(&playlist, 1.5).unwrap();
        assert_eq!(prefs.playlist_volume(&playlist), 1.0);

        prefs.set_playlist_volume(&playlist, -3.0).unwrap();
        assert_eq!(prefs.playlist_volume(&playlist), 0.0);

        prefs.set_playlist_volume(&playlist, f32::NAN).unwrap();
        assert_eq!(prefs.playlist_volume(&playlist), 1.0);
    }

    #[test]
    fn remove_slot_image_reports_presence() {
        let prefs = PreferenceStore::open(MemoryBackend::new()).unwrap();
        let (playlist, sound) = ids();

        assert!(!prefs.remove_slot_image(&playlist, &sound).unwrap());
        prefs.set_slot_image(&playlist, &sound, "fire.webp").unwrap();
        assert!(prefs.remove_slot_image(&playlist, &sound).unwrap());
        assert!(!prefs.has_entries(&playlist));
    }

    #[test]
    fn corrupt_documents_start_empty() {
        let backend = MemoryBackend::new()
            .with_value(KEY_SLOT_IMAGES, "{not json")
            .with_value(KEY_PLAYLIST_VOLUMES, r#"{"tavern":0.3}"#);
        let prefs = PreferenceStore::open(backend).unwrap();
        let (playlist, sound) = ids();

        assert_eq!(prefs.slot_image(&playlist, &sound), None);
        assert_eq!(prefs.playlist_volume(&playlist), 0.3);
    }
}
