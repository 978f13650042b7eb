//! Loading and saving the settings record
//!
//! Persisted to `<config dir>/Audio Processor/config.json` unless a path is
//! given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::AppConfig;
use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "Audio Processor";
const CONFIG_FILE: &str = "config.json";

/// Default location of the settings file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE))
}

impl AppConfig {
    /// Load settings from `path`, or return defaults if missing or unreadable
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                log::debug!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err("Settings file not found".to_string());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Save settings to `path`, creating its directory if needed
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::ConfigIo(format!("{}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::ConfigIo(format!("Failed to serialize settings: {}", e)))?;

        fs::write(path, json)
            .map_err(|e| AppError::ConfigIo(format!("{}: {}", path.display(), e)))?;

        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConversionConfig;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = AppConfig {
            last_folder: "/music/audiobook".to_string(),
            check_missing_files: true,
            convert_config: ConversionConfig {
                format: "wav".to_string(),
                codec: "pcm_s24le".to_string(),
                bitrate: "320k".to_string(),
                channels: 6,
                sample_rate: 96000,
                start_time: "00:00:05".to_string(),
                end_time: "01:02:03".to_string(),
            },
        };

        config.save(&path).unwrap();
        assert!(path.exists());

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = AppConfig::load(&temp_dir.path().join("absent.json"));
        assert_eq!(loaded, AppConfig::default());
        assert_eq!(loaded.convert_config.codec, "libmp3lame");
    }

    #[test]
    fn test_load_corrupt_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn test_save_into_unwritable_location_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = AppConfig::default().save(&blocker.join("config.json"));
        assert!(matches!(result, Err(AppError::ConfigIo(_))));
    }

    #[test]
    fn test_default_config_path_names_app() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("Audio Processor/config.json"));
        }
    }
}
