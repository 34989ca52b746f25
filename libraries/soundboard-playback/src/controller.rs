//! Transport controller - core orchestration
//!
//! Translates transport intents into updates on the replicated document and
//! reacts to the document's change notifications. Local state (focus,
//! markers, playhead) is only ever mutated synchronously; the state lock is
//! released before any document write is awaited.

use crate::{
    error::{PlaybackError, Result},
    state::TransportState,
    timeline::{format_time, progress, seek_target},
    types::{SeekPreview, SlotState, TransportConfig, TransportFocus, TransportIndicators},
    view::Frame,
};
use soundboard_core::{
    DocumentEvent, DocumentStore, MediaBackend, Playlist, PlaylistId, Sound, SoundId, SoundUpdate,
};
use soundboard_storage::PreferenceStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Transport controller for one panel instance
pub struct TransportController {
    documents: Arc<dyn DocumentStore>,
    media: Arc<dyn MediaBackend>,
    preferences: Arc<PreferenceStore>,
    config: TransportConfig,
    state: Mutex<TransportState>,
}

impl TransportController {
    /// Create a controller with no playlist selected
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaBackend>,
        preferences: Arc<PreferenceStore>,
        config: TransportConfig,
    ) -> Self {
        let ttl = Duration::from_millis(config.manual_stop_ttl_ms);
        Self {
            documents,
            media,
            preferences,
            config,
            state: Mutex::new(TransportState::new(ttl)),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub(crate) fn documents(&self) -> &dyn DocumentStore {
        self.documents.as_ref()
    }

    pub(crate) fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut TransportState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Subscribe to the document store's change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.documents.subscribe()
    }

    // ===== Focus =====

    /// Currently selected playlist
    pub fn current_playlist(&self) -> Option<PlaylistId> {
        self.lock().current_playlist.clone()
    }

    /// Current transport focus
    pub fn focus(&self) -> Option<TransportFocus> {
        self.lock().focus()
    }

    /// Select a playlist. Returns false when it already was the current one.
    pub fn select_playlist(&self, playlist_id: &PlaylistId) -> Result<bool> {
        if self.documents.playlist(playlist_id).is_none() {
            return Err(PlaybackError::PlaylistNotFound(playlist_id.clone()));
        }

        let changed = self.lock().select(Some(playlist_id.clone()));
        if changed {
            debug!("Selected playlist {}", playlist_id);
        }
        Ok(changed)
    }

    /// Point the transport at a sound of the current playlist
    pub fn focus_sound(&self, sound_id: &SoundId) -> Result<()> {
        let playlist = self.current()?;
        if playlist.sound(sound_id).is_none() {
            return Err(PlaybackError::SoundNotFound(sound_id.clone()));
        }
        self.lock().focused = Some(sound_id.clone());
        Ok(())
    }

    pub fn clear_focus(&self) {
        let mut state = self.lock();
        state.focused = None;
        state.seeking = false;
    }

    /// Current playlist as read from the document cache
    pub(crate) fn current(&self) -> Result<Playlist> {
        let playlist_id = self
            .current_playlist()
            .ok_or(PlaybackError::NoPlaylistSelected)?;

        match self.documents.playlist(&playlist_id) {
            Some(playlist) => Ok(playlist),
            None => {
                let mut state = self.lock();
                if state.is_current(&playlist_id) {
                    state.select(None);
                }
                debug!("Current playlist {} no longer exists", playlist_id);
                Err(PlaybackError::PlaylistNotFound(playlist_id))
            }
        }
    }

    /// Focused sound as read from the document cache.
    ///
    /// A focus that no longer resolves is cleared.
    pub fn focused_sound(&self) -> Option<(PlaylistId, Sound)> {
        let (playlist_id, sound_id) = {
            let state = self.lock();
            (state.current_playlist.clone()?, state.focused.clone()?)
        };

        let sound = self
            .documents
            .playlist(&playlist_id)
            .and_then(|p| p.sound(&sound_id).cloned());

        match sound {
            Some(sound) => Some((playlist_id, sound)),
            None => {
                let mut state = self.lock();
                if state.focused.as_ref() == Some(&sound_id) {
                    state.focused = None;
                    state.seeking = false;
                }
                debug!("Cleared stale focus on {}", sound_id);
                None
            }
        }
    }

    // ===== Accessors =====

    /// Position of `sound` in seconds, as the transport displays it
    pub fn sound_time(&self, sound: &Sound) -> f64 {
        let duration = self.media.duration(sound);
        self.lock()
            .playhead
            .current_time(sound, duration, Instant::now())
    }

    /// Focused sound's current position in seconds (0 when nothing is focused)
    pub fn current_time(&self) -> f64 {
        self.focused_sound()
            .map_or(0.0, |(_, sound)| self.sound_time(&sound))
    }

    /// Focused sound's duration in seconds (0 while unknown)
    pub fn duration(&self) -> f64 {
        self.focused_sound()
            .and_then(|(_, sound)| self.media.duration(&sound))
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0)
    }

    pub fn is_focused(&self, sound_id: &SoundId) -> bool {
        self.lock().focused.as_ref() == Some(sound_id)
    }

    /// Whether any sound of the playlist is playing
    pub fn is_playlist_playing(&self, playlist_id: &PlaylistId) -> bool {
        self.documents
            .playlist(playlist_id)
            .is_some_and(|p| p.is_playing())
    }

    pub fn is_seeking(&self) -> bool {
        self.lock().seeking
    }

    // ===== Transport commands =====

    /// Focus a sound of the current playlist and pause or resume it.
    ///
    /// Pausing records the current position so playback resumes there.
    pub async fn toggle_play(&self, sound_id: &SoundId) -> Result<()> {
        let playlist = self.current()?;
        let sound = playlist
            .sound(sound_id)
            .cloned()
            .ok_or_else(|| PlaybackError::SoundNotFound(sound_id.clone()))?;

        self.lock().focused = Some(sound.id.clone());

        if sound.playing {
            let position = self.sound_time(&sound);
            self.manual_stop(
                &playlist.id,
                &sound,
                SoundUpdate::new().playing(false).paused_time(position),
            )
            .await
        } else {
            self.update(&playlist.id, &sound.id, SoundUpdate::new().playing(true), "play")
                .await
        }
    }

    /// Play/pause button: toggles the focused sound, focusing the first
    /// sound when nothing is focused
    pub async fn play_pause(&self) -> Result<()> {
        if let Some((_, sound)) = self.focused_sound() {
            return self.toggle_play(&sound.id).await;
        }

        let playlist = self.current()?;
        match playlist.sounds.first() {
            Some(first) => self.toggle_play(&first.id).await,
            None => Ok(()),
        }
    }

    /// Stop the focused sound and rewind it to the start
    pub async fn stop(&self) -> Result<()> {
        let Some((playlist_id, sound)) = self.focused_sound() else {
            return Ok(());
        };

        self.manual_stop(
            &playlist_id,
            &sound,
            SoundUpdate::new().playing(false).paused_time(0.0),
        )
        .await
    }

    /// Flip the focused sound's repeat flag
    pub async fn toggle_loop(&self) -> Result<()> {
        let Some((playlist_id, sound)) = self.focused_sound() else {
            return Ok(());
        };

        self.update(
            &playlist_id,
            &sound.id,
            SoundUpdate::new().repeat(!sound.repeat),
            "toggle loop of",
        )
        .await
    }

    /// Set the focused sound's replicated volume and re-apply the local
    /// playlist multiplier to its output
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        if !volume.is_finite() {
            return Err(PlaybackError::InvalidInput(format!(
                "volume must be a number, got {volume}"
            )));
        }
        let Some((playlist_id, sound)) = self.focused_sound() else {
            return Ok(());
        };

        let volume = volume.clamp(0.0, 1.0);
        self.update(
            &playlist_id,
            &sound.id,
            SoundUpdate::new().volume(volume),
            "set volume of",
        )
        .await?;

        let multiplier = self.preferences.playlist_volume(&playlist_id);
        self.media.set_output_volume(&sound.id, volume * multiplier);
        Ok(())
    }

    /// A seek drag started: the sync loop stops painting the progress bar
    pub fn begin_seek(&self) {
        self.lock().seeking = true;
    }

    /// A seek drag ended without committing
    pub fn cancel_seek(&self) {
        self.lock().seeking = false;
    }

    /// Visual-only position for a seek drag at `fraction`
    pub fn preview_seek(&self, fraction: f64) -> SeekPreview {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        SeekPreview {
            fraction,
            label: format_time(fraction * self.duration()),
        }
    }

    /// Commit a seek of the focused sound to `fraction` of its duration.
    ///
    /// The host cannot reposition a live stream, so this stops the sound and
    /// restarts it at the target. Ends any seek drag. A sound whose duration
    /// is not known yet is left alone.
    pub async fn seek(&self, fraction: f64) -> Result<()> {
        self.cancel_seek();

        let Some((playlist_id, sound)) = self.focused_sound() else {
            return Ok(());
        };

        let duration = self.media.duration(&sound).unwrap_or(0.0);
        let Some(target) = seek_target(fraction, duration, self.config.seek_end_margin) else {
            debug!("Ignoring seek of {}: duration not known yet", sound.id);
            return Ok(());
        };

        self.manual_stop(&playlist_id, &sound, SoundUpdate::new().playing(false))
            .await?;
        self.update(
            &playlist_id,
            &sound.id,
            SoundUpdate::new().playing(true).paused_time(target),
            "restart",
        )
        .await
    }

    /// Move focus to the next sound, wrapping to the first
    pub fn next(&self) -> Option<SoundId> {
        self.step(true)
    }

    /// Move focus to the previous sound, wrapping to the last
    pub fn prev(&self) -> Option<SoundId> {
        self.step(false)
    }

    fn step(&self, forward: bool) -> Option<SoundId> {
        let playlist = self.current().ok()?;
        let len = playlist.sounds.len();
        if len == 0 {
            return None;
        }

        let mut state = self.lock();
        let index = state.focused.as_ref().and_then(|id| playlist.position(id));
        let target = match (forward, index) {
            (true, Some(i)) if i + 1 < len => i + 1,
            (true, _) => 0,
            (false, Some(i)) if i > 0 => i - 1,
            (false, _) => len - 1,
        };

        let id = playlist.sounds[target].id.clone();
        state.focused = Some(id.clone());
        Some(id)
    }

    /// Issue a `playing: false` update caused by a local action.
    ///
    /// Only a playing sound gets a marker: a stopped one produces no
    /// notification that could consume it.
    pub(crate) async fn manual_stop(
        &self,
        playlist_id: &PlaylistId,
        sound: &Sound,
        update: SoundUpdate,
    ) -> Result<()> {
        if sound.playing {
            self.lock().markers.mark(&sound.id, Instant::now());
        }

        let result = self.update(playlist_id, &sound.id, update, "stop").await;
        if result.is_err() {
            self.lock().markers.unmark(&sound.id);
        }
        result
    }

    async fn update(
        &self,
        playlist_id: &PlaylistId,
        sound_id: &SoundId,
        update: SoundUpdate,
        action: &str,
    ) -> Result<()> {
        debug!("Update {}: {:?}", sound_id, update);
        self.documents
            .update_sound(playlist_id, sound_id, update)
            .await
            .map_err(|e| {
                warn!("Failed to {} sound {}: {}", action, sound_id, e);
                PlaybackError::from(e)
            })
    }

    // ===== Synchronization =====

    /// React to a change notification from the document store
    pub async fn handle_event(&self, event: &DocumentEvent) {
        match event {
            DocumentEvent::SoundUpdated {
                playlist_id,
                sound,
                changes,
            } => {
                if let Some(playing) = changes.playing {
                    self.on_playing_changed(playlist_id, sound, playing).await;
                }
            }
            DocumentEvent::SoundsDeleted {
                playlist_id,
                sound_ids,
            } => self.on_sounds_deleted(playlist_id, sound_ids),
            DocumentEvent::PlaylistDeleted { playlist_id } => self.forget_playlist(playlist_id, None),
            DocumentEvent::SoundsCreated { .. }
            | DocumentEvent::PlaylistCreated { .. }
            | DocumentEvent::PlaylistUpdated { .. } => {}
        }
    }

    async fn on_playing_changed(&self, playlist_id: &PlaylistId, sound: &Sound, playing: bool) {
        let now = Instant::now();
        self.lock().playhead.on_playing_changed(sound, now);
        if playing {
            return;
        }

        let playlist = self.documents.playlist(playlist_id);
        let next = {
            let mut state = self.lock();
            if state.markers.consume(&sound.id, now) {
                debug!("Manual stop of {}", sound.id);
                return;
            }
            if !state.is_focused(playlist_id, &sound.id) || sound.repeat {
                return;
            }

            // Natural end of the focused track: advance, but never wrap
            let Some(next) = playlist.as_ref().and_then(|p| {
                let index = p.position(&sound.id)?;
                p.sounds.get(index + 1).cloned()
            }) else {
                debug!("Reached the end of playlist {}", playlist_id);
                return;
            };
            state.focused = Some(next.id.clone());
            next
        };

        info!("Advancing from {} to {}", sound.name, next.name);
        // Logged by update; nothing else to do on failure
        let _ = self
            .update(playlist_id, &next.id, SoundUpdate::new().playing(true), "auto-advance to")
            .await;
    }

    fn on_sounds_deleted(&self, playlist_id: &PlaylistId, sound_ids: &[SoundId]) {
        {
            let mut state = self.lock();
            for sound_id in sound_ids {
                state.markers.unmark(sound_id);
                state.playhead.forget(sound_id);
                if state.is_focused(playlist_id, sound_id) {
                    state.focused = None;
                    state.seeking = false;
                }
            }
        }

        for sound_id in sound_ids {
            if let Err(e) = self.preferences.purge_sound(playlist_id, sound_id) {
                warn!("Failed to purge slot image of {}: {}", sound_id, e);
            }
        }
    }

    /// Drop local state and preferences of a deleted playlist
    pub(crate) fn forget_playlist(&self, playlist_id: &PlaylistId, playlist: Option<&Playlist>) {
        self.lock().forget_playlist(playlist, playlist_id);
        if let Err(e) = self.preferences.purge_playlist(playlist_id) {
            warn!("Failed to purge preferences of playlist {}: {}", playlist_id, e);
        }
    }

    /// Periodic reconciliation against the document cache.
    ///
    /// Expires stale markers, clears dangling focus, keeps playhead anchors
    /// in line with what is playing, and re-applies every playlist's local
    /// volume multiplier.
    pub fn tick(&self) {
        let now = Instant::now();
        let playlists = self.documents.playlists();

        {
            let mut state = self.lock();

            let expired = state.markers.prune(now);
            if expired > 0 {
                debug!("Expired {} manual-stop markers", expired);
            }

            let current = state
                .current_playlist
                .as_ref()
                .and_then(|id| playlists.iter().find(|p| &p.id == id));
            if state.validate(current) {
                debug!("Cleared stale transport focus");
            }

            let playing: Vec<&Sound> = playlists
                .iter()
                .flat_map(|p| p.sounds.iter())
                .filter(|s| s.playing)
                .collect();
            let playing_ids: HashSet<&SoundId> = playing.iter().map(|s| &s.id).collect();
            state.playhead.retain(|id| playing_ids.contains(id));
            for sound in playing {
                state.playhead.ensure_anchor(sound, now);
            }
        }

        for playlist in &playlists {
            self.apply_playlist_volume(playlist);
        }
    }

    /// Drive every playing sound of `playlist` at its volume times the local multiplier
    pub fn apply_playlist_volume(&self, playlist: &Playlist) {
        let multiplier = self.preferences.playlist_volume(&playlist.id);
        for sound in playlist.sounds.iter().filter(|s| s.playing) {
            self.media
                .set_output_volume(&sound.id, sound.volume * multiplier);
        }
    }

    /// Derive the visually observable state
    pub fn frame(&self) -> Frame {
        let now = Instant::now();
        let playlists = self.documents.playlists();
        let state = self.lock();

        let current = state
            .current_playlist
            .as_ref()
            .and_then(|id| playlists.iter().find(|p| &p.id == id));
        let focused = current.and_then(|p| state.focused.as_ref().and_then(|id| p.sound(id)));

        let (current_time, duration) = focused.map_or((0.0, 0.0), |sound| {
            let duration = self.media.duration(sound);
            (
                state.playhead.current_time(sound, duration, now),
                duration.unwrap_or(0.0),
            )
        });

        Frame {
            any_playing: current.is_some_and(Playlist::is_playing),
            playlists: playlists
                .iter()
                .map(|p| (p.id.clone(), p.is_playing()))
                .collect(),
            slots: current
                .map(|p| {
                    p.sounds
                        .iter()
                        .map(|s| {
                            let state = SlotState {
                                playing: s.playing,
                                focused: state.focused.as_ref() == Some(&s.id),
                            };
                            (s.id.clone(), state)
                        })
                        .collect()
                })
                .unwrap_or_default(),
            transport: focused.map_or_else(TransportIndicators::default, |s| TransportIndicators {
                title: Some(s.name.clone()),
                playing: s.playing,
                looping: s.repeat,
                volume: s.volume,
            }),
            progress: progress(current_time, duration),
            current_label: format_time(current_time),
            duration_label: format_time(duration),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_marker(&self, sound_id: &SoundId) -> bool {
        self.lock().markers.contains(sound_id)
    }
}
