//! Soundboard Metadata
//!
//! Audio file discovery and duration probing.
//!
//! This crate provides:
//! - Folder scanning for importable audio files
//! - Duration probing via lofty
//! - [`ProbedMedia`], a [`MediaBackend`](soundboard_core::MediaBackend) that
//!   reports probed durations and records locally applied gains
//!
//! # Example
//!
//! ```rust,no_run
//! use soundboard_metadata::{probe_duration, FileScanner};
//! use std::path::Path;
//! # fn example() -> soundboard_metadata::Result<()> {
//! let files = FileScanner::new().scan_directory(Path::new("/audio/tavern"))?;
//! for file in &files {
//!     println!("{}: {:.1}s", file.display(), probe_duration(file)?);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod media;
mod probe;
mod scanner;

pub use error::{MetadataError, Result};
pub use media::ProbedMedia;
pub use probe::probe_duration;
pub use scanner::{is_audio_file, FileScanner, SUPPORTED_EXTENSIONS};
