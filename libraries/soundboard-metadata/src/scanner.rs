//! File scanning for importable audio files

use crate::{MetadataError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Audio file extensions accepted for import (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav", "webm", "m4a", "flac"];

/// Scanner for audio files in a folder
///
/// Only the folder's direct children are considered by default, matching a
/// "pick a folder, import its files" gesture.
pub struct FileScanner {
    follow_links: bool,
    max_depth: usize,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: 1,
        }
    }
}

impl FileScanner {
    /// Create a new file scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Scan a folder for audio files, sorted by path
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        if !path.is_dir() {
            return Err(MetadataError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let walker = WalkDir::new(path)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth);

        let mut audio_files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();

        audio_files.sort();
        tracing::debug!(
            "Found {} audio files in {}",
            audio_files.len(),
            path.display()
        );
        Ok(audio_files)
    }

    /// Keep only the paths that name existing audio files
    pub fn validate_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|path| path.is_file() && is_audio_file(path))
            .cloned()
            .collect()
    }
}

/// Check if a path has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
