//! Transport state
//!
//! Everything the controller tracks locally about the panel: the current
//! playlist, the focused sound, the seek-drag flag, manual-stop markers,
//! playhead anchors and per-playlist session state. Owned by the controller
//! behind a mutex that is never held across an await.

use crate::markers::ManualStopMarkers;
use crate::playhead::Playhead;
use crate::types::{PlaylistSessionState, TransportFocus};
use soundboard_core::{Playlist, PlaylistId, SoundId};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug)]
pub(crate) struct TransportState {
    pub(crate) current_playlist: Option<PlaylistId>,
    pub(crate) focused: Option<SoundId>,
    pub(crate) seeking: bool,
    pub(crate) markers: ManualStopMarkers,
    pub(crate) playhead: Playhead,
    pub(crate) sessions: HashMap<PlaylistId, PlaylistSessionState>,
}

impl TransportState {
    pub(crate) fn new(marker_ttl: Duration) -> Self {
        Self {
            current_playlist: None,
            focused: None,
            seeking: false,
            markers: ManualStopMarkers::new(marker_ttl),
            playhead: Playhead::default(),
            sessions: HashMap::new(),
        }
    }

    pub(crate) fn focus(&self) -> Option<TransportFocus> {
        self.current_playlist.as_ref().map(|playlist_id| TransportFocus {
            playlist_id: playlist_id.clone(),
            sound_id: self.focused.clone(),
        })
    }

    /// Switch playlists; focus never survives a playlist change
    pub(crate) fn select(&mut self, playlist_id: Option<PlaylistId>) -> bool {
        if self.current_playlist == playlist_id {
            return false;
        }
        self.current_playlist = playlist_id;
        self.focused = None;
        self.seeking = false;
        true
    }

    pub(crate) fn is_current(&self, playlist_id: &PlaylistId) -> bool {
        self.current_playlist.as_ref() == Some(playlist_id)
    }

    pub(crate) fn is_focused(&self, playlist_id: &PlaylistId, sound_id: &SoundId) -> bool {
        self.is_current(playlist_id) && self.focused.as_ref() == Some(sound_id)
    }

    /// Drop references to things that no longer exist.
    ///
    /// `current` is the current playlist as read from the document cache.
    /// Returns true when anything was cleared.
    pub(crate) fn validate(&mut self, current: Option<&Playlist>) -> bool {
        if self.current_playlist.is_none() {
            return false;
        }

        let Some(playlist) = current else {
            self.select(None);
            return true;
        };

        match &self.focused {
            Some(sound_id) if playlist.sound(sound_id).is_none() => {
                self.focused = None;
                self.seeking = false;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn session(&self, playlist_id: &PlaylistId) -> PlaylistSessionState {
        self.sessions.get(playlist_id).copied().unwrap_or_default()
    }

    pub(crate) fn session_mut(&mut self, playlist_id: &PlaylistId) -> &mut PlaylistSessionState {
        self.sessions.entry(playlist_id.clone()).or_default()
    }

    /// Forget everything local about a deleted playlist
    pub(crate) fn forget_playlist(&mut self, playlist: Option<&Playlist>, playlist_id: &PlaylistId) {
        self.sessions.remove(playlist_id);
        if let Some(playlist) = playlist {
            for sound in &playlist.sounds {
                self.markers.unmark(&sound.id);
                self.playhead.forget(&sound.id);
            }
        }
        if self.is_current(playlist_id) {
            self.select(None);
        }
    }
}
