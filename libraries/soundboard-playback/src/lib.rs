//! Soundboard - Playback Synchronization & Transport Control
//!
//! Keeps a locally rendered transport (play button, timeline, slot
//! highlighting) consistent with an externally owned, asynchronously
//! replicated playback document.
//!
//! This crate provides:
//! - Transport verbs (play/pause, stop, loop, volume, seek, next/prev)
//!   issued as partial updates against a [`DocumentStore`]
//! - Auto-advance on natural end of track, told apart from manual stops
//! - A periodic sync loop that repaints only what changed
//! - Playlist and sound management for the panel
//!
//! # Architecture
//!
//! `soundboard-playback` never decodes or mixes audio and never talks to the
//! network itself:
//! - Replication is owned by a [`DocumentStore`] implementation
//! - Audible output is owned by a [`MediaBackend`] implementation
//! - The UI is reached through the [`PanelView`] trait
//!
//! # Example
//!
//! ```rust
//! use soundboard_core::{MemoryDocumentStore, MemoryMedia};
//! use soundboard_playback::{TransportConfig, TransportController};
//! use soundboard_storage::{MemoryBackend, PreferenceStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = Arc::new(MemoryDocumentStore::new());
//! let playlist = documents.seed_playlist("Tavern", &["Crowd", "Fireplace"]);
//!
//! let controller = TransportController::new(
//!     documents.clone(),
//!     Arc::new(MemoryMedia::new()),
//!     Arc::new(PreferenceStore::open(MemoryBackend::new())?),
//!     TransportConfig::default(),
//! );
//!
//! controller.select_playlist(&playlist.id)?;
//! controller.play_pause().await?; // focuses and plays "Crowd"
//! controller.next();              // focus moves to "Fireplace"
//! # Ok(())
//! # }
//! ```
//!
//! [`DocumentStore`]: soundboard_core::DocumentStore
//! [`MediaBackend`]: soundboard_core::MediaBackend

mod controller;
mod error;
mod markers;
mod panel;
mod playhead;
mod state;
mod sync;
pub mod timeline;
pub mod types;
mod view;

// Public exports
pub use controller::TransportController;
pub use error::{PlaybackError, Result};
pub use panel::SoundPanel;
pub use sync::{SyncHandle, SyncLoop};
pub use types::{
    PickerEntry, PickerGroup, PlaylistItem, PlaylistSessionState, SeekPreview, SlotState,
    SlotView, TransportConfig, TransportFocus, TransportIndicators,
};
pub use view::{Frame, PanelView, Renderer};
