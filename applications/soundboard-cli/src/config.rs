/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use soundboard_playback::TransportConfig;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "soundboard.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding the local preference documents
    #[serde(default = "default_preferences_dir")]
    pub preferences_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `soundboard.toml` is used if
    /// present. `SOUNDBOARD_<SECTION>__<KEY>` variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let transport = &self.transport;

        if transport.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "transport.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        if !(transport.seek_end_margin.is_finite() && transport.seek_end_margin >= 0.0) {
            return Err(CliError::Config(format!(
                "transport.seek_end_margin must be a non-negative number of seconds, got {}",
                transport.seek_end_margin
            )));
        }

        if !(0.0..=1.0).contains(&transport.default_sound_volume) {
            return Err(CliError::Config(format!(
                "transport.default_sound_volume must be within [0, 1], got {}",
                transport.default_sound_volume
            )));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        preferences_dir: default_preferences_dir(),
    }
}

fn default_preferences_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            storage: default_storage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transport.poll_interval_ms, 100);
        assert_eq!(config.storage.preferences_dir, PathBuf::from("./data"));
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
[transport]
poll_interval_ms = 250
seek_end_margin = 1.0

[storage]
preferences_dir = "/tmp/soundboard-prefs"
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.transport.poll_interval_ms, 250);
        assert_eq!(config.transport.seek_end_margin, 1.0);
        assert_eq!(config.transport.manual_stop_ttl_ms, 2000);
        assert_eq!(
            config.storage.preferences_dir,
            PathBuf::from("/tmp/soundboard-prefs")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/soundboard.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("[transport]\npoll_interval_ms = 0\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(CliError::Config(_))
        ));

        let mut config = AppConfig::default();
        config.transport.default_sound_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.transport.seek_end_margin = -0.1;
        assert!(config.validate().is_err());
    }
}
