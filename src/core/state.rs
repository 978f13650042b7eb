//! Session state shared between commands
//!
//! Everything a command needs to know about earlier commands lives here and
//! is passed by reference; there are no globals.

use std::path::{Path, PathBuf};

use super::scanning::ScanResult;
use crate::settings::{AppConfig, ConversionConfig};

/// State of one interactive session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Persisted record (last folder, missing-file flag, conversion parameters)
    pub config: AppConfig,
    /// Result of the most recent scan
    pub scan: ScanResult,
    /// Folder the current scan belongs to
    pub folder: Option<PathBuf>,
}

impl SessionState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The folder a command should act on: the explicit one, else the last used
    pub fn resolve_folder(&self, requested: Option<&Path>) -> Option<PathBuf> {
        match requested {
            Some(path) if !path.as_os_str().is_empty() => Some(path.to_path_buf()),
            Some(_) => None,
            None if self.config.last_folder.is_empty() => None,
            None => Some(PathBuf::from(&self.config.last_folder)),
        }
    }

    /// Remember a folder as the last one used
    pub fn set_folder(&mut self, folder: &Path) {
        self.config.last_folder = folder.to_string_lossy().to_string();
    }

    /// Replace the current scan
    pub fn set_scan(&mut self, folder: &Path, scan: ScanResult) {
        self.folder = Some(folder.to_path_buf());
        self.scan = scan;
    }

    pub fn file_names(&self) -> Vec<String> {
        self.scan.file_names()
    }

    pub fn conversion(&self) -> &ConversionConfig {
        &self.config.convert_config
    }

    pub fn conversion_mut(&mut self) -> &mut ConversionConfig {
        &mut self.config.convert_config
    }
}
