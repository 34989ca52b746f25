//! Panel operations
//!
//! Playlist and sound management around the transport: creating, deleting
//! and reordering things in the replicated document, local slot images and
//! playlist volumes, and the view models a full render needs.

use crate::controller::TransportController;
use crate::error::{PlaybackError, Result};
use crate::types::{PickerEntry, PickerGroup, PlaylistItem, SlotView};
use soundboard_core::{
    clean_sound_name, NewPlaylist, NewSound, Playlist, PlaylistCategory, PlaylistId, Sound,
    SoundId, SoundSelection, SoundUpdate, SortUpdate, SORT_STEP,
};
use soundboard_metadata::{is_audio_file, FileScanner};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The soundboard panel: transport plus playlist management
pub struct SoundPanel {
    controller: Arc<TransportController>,
    scanner: FileScanner,
}

impl SoundPanel {
    pub fn new(controller: Arc<TransportController>) -> Self {
        Self {
            controller,
            scanner: FileScanner::new(),
        }
    }

    /// Transport controller shared with the sync loop
    pub fn controller(&self) -> &Arc<TransportController> {
        &self.controller
    }

    // ===== Playlists =====

    /// Make a playlist current; selecting another playlist clears focus
    pub fn select_playlist(&self, playlist_id: &PlaylistId) -> Result<bool> {
        self.controller.select_playlist(playlist_id)
    }

    /// Create an empty music playlist and make it current
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlaybackError::InvalidInput(
                "playlist name must not be empty".to_string(),
            ));
        }

        let playlist = self
            .controller
            .documents()
            .create_playlist(NewPlaylist::new(name))
            .await
            .map_err(|e| {
                warn!("Failed to create playlist '{}': {}", name, e);
                PlaybackError::from(e)
            })?;

        self.controller
            .with_state(|state| state.select(Some(playlist.id.clone())));
        info!("Created playlist '{}'", playlist.name);
        Ok(playlist)
    }

    /// Delete a playlist after stopping whatever it is playing.
    ///
    /// Stopping is best-effort; local preferences of the playlist are purged.
    pub async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self
            .controller
            .documents()
            .playlist(playlist_id)
            .ok_or_else(|| PlaybackError::PlaylistNotFound(playlist_id.clone()))?;

        for sound in playlist.sounds.iter().filter(|s| s.playing) {
            if self
                .controller
                .manual_stop(playlist_id, sound, SoundUpdate::new().playing(false))
                .await
                .is_err()
            {
                debug!("Could not stop {} before deleting its playlist", sound.id);
            }
        }

        self.controller
            .documents()
            .delete_playlist(playlist_id)
            .await
            .map_err(|e| {
                warn!("Failed to delete playlist {}: {}", playlist_id, e);
                PlaybackError::from(e)
            })?;

        self.controller.forget_playlist(playlist_id, Some(&playlist));
        info!("Deleted playlist '{}'", playlist.name);
        Ok(())
    }

    /// Change a playlist's category tag
    pub async fn set_category(
        &self,
        playlist_id: &PlaylistId,
        category: PlaylistCategory,
    ) -> Result<()> {
        self.controller
            .documents()
            .set_category(playlist_id, category)
            .await
            .map_err(PlaybackError::from)
    }

    // ===== Sounds =====

    /// Fill a new slot from a picker selection and focus it
    pub async fn add_sound(&self, selection: SoundSelection) -> Result<Sound> {
        let playlist = self.controller.current()?;
        let default_volume = self.controller.config().default_sound_volume;

        let data = match selection {
            SoundSelection::Unsaved { path, name } => {
                NewSound::new(name, path).with_volume(default_volume)
            }
            SoundSelection::Replicated { id, playlist_id } => {
                let source = self
                    .controller
                    .documents()
                    .playlist(&playlist_id)
                    .and_then(|p| p.sound(&id).cloned())
                    .ok_or(PlaybackError::SoundNotFound(id))?;
                NewSound::new(source.name, source.path).with_volume(source.volume)
            }
        };

        let created = self.create_sounds(&playlist.id, vec![data]).await?;
        let sound = created
            .into_iter()
            .next()
            .ok_or_else(|| PlaybackError::InvalidInput("no sound was created".to_string()))?;

        self.controller.with_state(|state| {
            if state.is_current(&playlist.id) {
                state.focused = Some(sound.id.clone());
            }
        });
        Ok(sound)
    }

    /// Add one sound per audio file path to the current playlist
    pub async fn import_files(&self, paths: &[String]) -> Result<Vec<Sound>> {
        let playlist = self.controller.current()?;
        let sounds: Vec<NewSound> = paths
            .iter()
            .filter(|p| is_audio_file(Path::new(p.as_str())))
            .map(|p| self.new_sound(p))
            .collect();

        if sounds.is_empty() {
            return Err(PlaybackError::NoAudioFiles(format!(
                "{} selected files",
                paths.len()
            )));
        }
        self.create_sounds(&playlist.id, sounds).await
    }

    /// Add every audio file directly inside `dir` to the current playlist
    pub async fn import_folder(&self, dir: &Path) -> Result<Vec<Sound>> {
        let playlist = self.controller.current()?;
        let files = self.scanner.scan_directory(dir)?;
        if files.is_empty() {
            return Err(PlaybackError::NoAudioFiles(dir.display().to_string()));
        }

        let sounds = files
            .iter()
            .map(|f| self.new_sound(&f.to_string_lossy()))
            .collect();
        self.create_sounds(&playlist.id, sounds).await
    }

    fn new_sound(&self, path: &str) -> NewSound {
        NewSound::new(clean_sound_name(path), path)
            .with_volume(self.controller.config().default_sound_volume)
    }

    async fn create_sounds(&self, playlist_id: &PlaylistId, sounds: Vec<NewSound>) -> Result<Vec<Sound>> {
        let count = sounds.len();
        let created = self
            .controller
            .documents()
            .create_sounds(playlist_id, sounds)
            .await
            .map_err(|e| {
                warn!("Failed to add {} sounds to {}: {}", count, playlist_id, e);
                PlaybackError::from(e)
            })?;
        info!("Added {} sounds to playlist {}", created.len(), playlist_id);
        Ok(created)
    }

    /// Remove a sound from the current playlist, stopping it first
    pub async fn remove_sound(&self, sound_id: &SoundId) -> Result<()> {
        let playlist = self.controller.current()?;
        let sound = playlist
            .sound(sound_id)
            .ok_or_else(|| PlaybackError::SoundNotFound(sound_id.clone()))?;

        if sound.playing
            && self
                .controller
                .manual_stop(&playlist.id, sound, SoundUpdate::new().playing(false))
                .await
                .is_err()
        {
            debug!("Could not stop {} before removing it", sound_id);
        }

        if let Err(e) = self.controller.preferences().purge_sound(&playlist.id, sound_id) {
            warn!("Failed to purge slot image of {}: {}", sound_id, e);
        }
        self.controller.with_state(|state| {
            if state.is_focused(&playlist.id, sound_id) {
                state.focused = None;
                state.seeking = false;
            }
        });

        self.controller
            .documents()
            .delete_sounds(&playlist.id, std::slice::from_ref(sound_id))
            .await
            .map_err(|e| {
                warn!("Failed to remove sound {}: {}", sound_id, e);
                PlaybackError::from(e)
            })
    }

    /// Move the slot at `from` to `to` and renumber every sort key.
    ///
    /// Out-of-range indices are ignored. Focus follows the sound, not the slot.
    pub async fn reorder_sounds(&self, from: usize, to: usize) -> Result<()> {
        let playlist = self.controller.current()?;
        let updates = match reorder(&playlist.sounds, from, to) {
            Some(updates) => updates,
            None => {
                debug!("Ignoring reorder {} -> {} in {}", from, to, playlist.id);
                return Ok(());
            }
        };

        self.controller
            .documents()
            .update_sort(&playlist.id, updates)
            .await
            .map_err(|e| {
                warn!("Failed to reorder playlist {}: {}", playlist.id, e);
                PlaybackError::from(e)
            })
    }

    // ===== Local preferences =====

    /// Attach an image to a slot of the current playlist
    pub fn set_slot_image(&self, sound_id: &SoundId, path: &str) -> Result<()> {
        let playlist = self.controller.current()?;
        if playlist.sound(sound_id).is_none() {
            return Err(PlaybackError::SoundNotFound(sound_id.clone()));
        }
        self.controller
            .preferences()
            .set_slot_image(&playlist.id, sound_id, path)?;
        Ok(())
    }

    /// Remove a slot's image from the current playlist
    pub fn remove_slot_image(&self, sound_id: &SoundId) -> Result<()> {
        let playlist_id = self
            .controller
            .current_playlist()
            .ok_or(PlaybackError::NoPlaylistSelected)?;
        self.controller
            .preferences()
            .remove_slot_image(&playlist_id, sound_id)?;
        Ok(())
    }

    /// Image of a slot in the current playlist
    pub fn slot_image(&self, sound_id: &SoundId) -> Option<String> {
        let playlist_id = self.controller.current_playlist()?;
        self.controller.preferences().slot_image(&playlist_id, sound_id)
    }

    /// Set a playlist's local volume multiplier and apply it right away
    pub fn set_playlist_volume(&self, playlist_id: &PlaylistId, volume: f32) -> Result<()> {
        self.controller
            .preferences()
            .set_playlist_volume(playlist_id, volume)?;

        if let Some(playlist) = self.controller.documents().playlist(playlist_id) {
            self.controller.apply_playlist_volume(&playlist);
        }
        Ok(())
    }

    /// Fold or unfold a playlist's volume slider; returns the new state
    pub fn toggle_volume_expanded(&self, playlist_id: &PlaylistId) -> bool {
        self.controller.with_state(|state| {
            let session = state.session_mut(playlist_id);
            session.volume_expanded = !session.volume_expanded;
            session.volume_expanded
        })
    }

    // ===== View models =====

    /// Slots of the current playlist, in order
    pub fn slots(&self) -> Vec<SlotView> {
        let Ok(playlist) = self.controller.current() else {
            return Vec::new();
        };
        let preferences = self.controller.preferences();

        playlist
            .sounds
            .iter()
            .enumerate()
            .map(|(index, sound)| SlotView {
                index,
                id: sound.id.clone(),
                name: sound.name.clone(),
                playing: sound.playing,
                active: self.controller.is_focused(&sound.id),
                image: preferences.slot_image(&playlist.id, &sound.id),
            })
            .collect()
    }

    /// Sidebar entries for every playlist
    pub fn playlist_items(&self) -> Vec<PlaylistItem> {
        let current = self.controller.current_playlist();
        let preferences = self.controller.preferences();

        self.controller
            .documents()
            .playlists()
            .into_iter()
            .map(|playlist| {
                let session = self.controller.with_state(|state| state.session(&playlist.id));
                PlaylistItem {
                    selected: current.as_ref() == Some(&playlist.id),
                    playing: playlist.is_playing(),
                    icon: playlist.category.icon(),
                    volume: preferences.playlist_volume(&playlist.id),
                    volume_expanded: session.volume_expanded,
                    id: playlist.id,
                    name: playlist.name,
                }
            })
            .collect()
    }

    /// Sounds across all playlists whose name contains `search` (case-insensitive)
    pub fn picker_entries(&self, search: &str) -> Vec<PickerGroup> {
        let needle = search.trim().to_lowercase();

        self.controller
            .documents()
            .playlists()
            .into_iter()
            .filter_map(|playlist| {
                let sounds: Vec<PickerEntry> = playlist
                    .sounds
                    .into_iter()
                    .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
                    .map(|s| PickerEntry {
                        id: s.id,
                        name: s.name,
                        path: s.path,
                    })
                    .collect();

                (!sounds.is_empty()).then(|| PickerGroup {
                    playlist_id: playlist.id,
                    playlist_name: playlist.name,
                    sounds,
                })
            })
            .collect()
    }
}

/// Sort keys after moving the sound at `from` to `to`
fn reorder(sounds: &[Sound], from: usize, to: usize) -> Option<Vec<SortUpdate>> {
    if from >= sounds.len() || to >= sounds.len() {
        return None;
    }

    let mut ordered: Vec<&Sound> = sounds.iter().collect();
    let moved = ordered.remove(from);
    ordered.insert(to, moved);

    Some(
        ordered
            .iter()
            .enumerate()
            .map(|(i, sound)| SortUpdate {
                id: sound.id.clone(),
                sort: (i as i64 + 1) * SORT_STEP,
            })
            .collect(),
    )
}
