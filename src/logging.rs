//! Logging configuration for Audio Processor
//!
//! Everything at debug level and above goes to a file at
//! `<local data dir>/Audio-Processor/logs/audio-processor.log`, which users can
//! attach to bug reports. The terminal already shows the session log through
//! the front-end, so the terminal logger is only added with `--verbose`.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "audio-processor.log";

/// Log files larger than this are moved aside at startup
const ROTATE_BYTES: u64 = 10 * 1024 * 1024;

/// Get the log directory path
pub fn get_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("Audio-Processor").join("logs"))
}

/// Move `log_path` to `<name>.old` once it grows past `limit` bytes.
/// Returns true if it was rotated.
fn rotate_if_large(log_path: &Path, limit: u64) -> bool {
    match fs::metadata(log_path) {
        Ok(metadata) if metadata.len() > limit => {
            let backup_path = log_path.with_extension("log.old");
            fs::rename(log_path, backup_path).is_ok()
        }
        _ => false,
    }
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Initialize the logging system
///
/// Returns the path to the log file on success. Without a usable log file,
/// only the terminal logger (if requested) is installed.
pub fn init_logging(verbose: bool) -> Option<PathBuf> {
    let config = log_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    let log_path = open_log_file().map(|(path, file)| {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
        path
    });

    if !loggers.is_empty() && CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== Audio Processor session started ===");
    if let Some(path) = &log_path {
        log::info!("Log file: {}", path.display());
    }

    log_path
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let Some(log_dir) = get_log_directory() else {
        eprintln!("Warning: Could not determine log directory");
        return None;
    };

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_large(&log_path, ROTATE_BYTES);

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some((log_path, file)),
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_log_directory_returns_path() {
        let dir = get_log_directory();
        assert!(dir.is_some(), "Should return a log directory path");
        assert!(
            dir.unwrap().to_string_lossy().contains("Audio-Processor"),
            "Path should contain app name"
        );
    }

    #[test]
    fn test_rotate_moves_large_log_aside() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, vec![b'x'; 64]).unwrap();

        assert!(!rotate_if_large(&log_path, 64));
        assert!(log_path.exists());

        assert!(rotate_if_large(&log_path, 10));
        assert!(!log_path.exists());
        assert!(temp_dir.path().join("audio-processor.log.old").exists());
    }

    #[test]
    fn test_rotate_ignores_missing_log() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!rotate_if_large(&temp_dir.path().join(LOG_FILE_NAME), 0));
    }
}
