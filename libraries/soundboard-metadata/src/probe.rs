/// Duration probing using lofty
use crate::error::{MetadataError, Result};
use lofty::AudioFile;
use std::path::Path;

/// Decoded duration of an audio file, in seconds
pub fn probe_duration(path: &Path) -> Result<f64> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }

    let tagged_file = lofty::read_from_path(path)?;
    Ok(tagged_file.properties().duration().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = probe_duration(Path::new("/nonexistent/rain.ogg")).unwrap_err();
        assert!(matches!(err, MetadataError::FileNotFound(_)));
    }

    #[test]
    fn garbage_file_is_a_lofty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        assert!(probe_duration(&path).is_err());
    }
}
