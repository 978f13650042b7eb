//! Error types shared by the scanner, the orchestrator and the dispatcher

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// How an external process ended. `None` means it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitState(pub Option<i32>);

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Application error kinds
#[derive(Error, Debug)]
pub enum AppError {
    #[error("ffmpeg not found: {0}. Install ffmpeg and add it to PATH")]
    ToolNotFound(String),

    #[error("Folder does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Choose a folder first")]
    NoFolderSelected,

    #[error("No audio files found in {}", .0.display())]
    NoAudioFiles(PathBuf),

    #[error("File is not in the scanned list: {0}")]
    UnknownFile(String),

    #[error("Could not read audio info for {}: {reason}", .path.display())]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("Stream-copy merge failed ({exit}):\n{stderr}")]
    MergeCopyFailed { exit: ExitState, stderr: String },

    #[error("Re-encoding merge failed ({exit}):\n{stderr}")]
    MergeReencodeFailed { exit: ExitState, stderr: String },

    #[error("Converting {file} failed ({exit}):\n{stderr}")]
    ConvertFailed {
        file: String,
        exit: ExitState,
        stderr: String,
    },

    #[error("Failed to save config: {0}")]
    ConfigIo(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
