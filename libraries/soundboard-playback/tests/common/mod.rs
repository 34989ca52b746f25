//! Shared test helpers for transport and sync loop tests

#![allow(dead_code)]

use soundboard_core::{
    DocumentEvent, MemoryDocumentStore, MemoryMedia, Playlist, PlaylistId, Sound, SoundId,
};
use soundboard_playback::{
    PanelView, SlotState, SoundPanel, TransportConfig, TransportController, TransportIndicators,
};
use soundboard_storage::{MemoryBackend, PreferenceStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::sync::broadcast;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// One panel instance wired to in-memory collaborators
pub struct Harness {
    pub documents: Arc<MemoryDocumentStore>,
    pub media: Arc<MemoryMedia>,
    pub preferences: Arc<PreferenceStore>,
    pub controller: Arc<TransportController>,
    pub panel: SoundPanel,
    pub playlist: Playlist,
    events: broadcast::Receiver<DocumentEvent>,
}

impl Harness {
    /// A selected playlist with one sound per name, each 60 seconds long
    pub fn new(names: &[&str]) -> Self {
        let documents = Arc::new(MemoryDocumentStore::new());
        let playlist = documents.seed_playlist("Tavern", names);
        Self::join(documents, playlist)
    }

    /// Another participant's panel on the same replicated documents
    pub fn join(documents: Arc<MemoryDocumentStore>, playlist: Playlist) -> Self {
        init_logging();

        let media = Arc::new(MemoryMedia::new());
        for sound in &playlist.sounds {
            media.set_duration(&sound.id, 60.0);
        }
        let preferences = Arc::new(PreferenceStore::open(MemoryBackend::new()).unwrap());
        let controller = Arc::new(TransportController::new(
            documents.clone(),
            media.clone(),
            preferences.clone(),
            TransportConfig::default(),
        ));
        controller.select_playlist(&playlist.id).unwrap();
        let events = controller.subscribe();
        let panel = SoundPanel::new(controller.clone());

        Self {
            documents,
            media,
            preferences,
            controller,
            panel,
            playlist,
            events,
        }
    }

    pub fn id(&self, index: usize) -> SoundId {
        self.playlist.sounds[index].id.clone()
    }

    pub fn sound(&self, index: usize) -> Sound {
        self.documents
            .sound(&self.playlist.id, &self.id(index))
            .unwrap()
    }

    pub fn playlist_id(&self) -> PlaylistId {
        self.playlist.id.clone()
    }

    /// Deliver every pending notification to the controller, including the
    /// ones its own reactions produce
    pub async fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_event(&event).await;
        }
    }

    /// Throw pending notifications away, as if they never arrived
    pub fn drop_events(&mut self) {
        while self.events.try_recv().is_ok() {}
    }
}

/// A view call, as recorded by [`RecordingView`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Render,
    AnyPlaying(bool),
    PlaylistPlaying(PlaylistId, bool),
    Slot(SoundId, SlotState),
    Transport(TransportIndicators),
    Progress(f64),
    TimeLabels(String, String),
}

/// Panel view that records every call
pub struct RecordingView {
    alive: AtomicBool,
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            alive: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn take(&self) -> Vec<ViewCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn progress_calls(calls: &[ViewCall]) -> Vec<f64> {
        calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PanelView for RecordingView {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn request_render(&self) {
        self.push(ViewCall::Render);
    }

    fn set_any_playing(&self, playing: bool) {
        self.push(ViewCall::AnyPlaying(playing));
    }

    fn set_playlist_playing(&self, playlist_id: &PlaylistId, playing: bool) {
        self.push(ViewCall::PlaylistPlaying(playlist_id.clone(), playing));
    }

    fn set_slot_state(&self, sound_id: &SoundId, state: SlotState) {
        self.push(ViewCall::Slot(sound_id.clone(), state));
    }

    fn set_transport(&self, indicators: &TransportIndicators) {
        self.push(ViewCall::Transport(indicators.clone()));
    }

    fn set_progress(&self, fraction: f64) {
        self.push(ViewCall::Progress(fraction));
    }

    fn set_time_labels(&self, current: &str, duration: &str) {
        self.push(ViewCall::TimeLabels(current.to_string(), duration.to_string()));
    }
}
