//! Audio Processor
//!
//! Scans folders of numbered audio files, reports gaps in the numbering, and
//! merges or converts the files by running ffmpeg.

pub mod app;
pub mod audio;
pub mod commands;
pub mod conversion;
pub mod core;
pub mod error;
pub mod logging;
pub mod settings;
pub mod ui;

#[cfg(test)]
mod test_fixtures;

pub use app::App;
pub use error::{AppError, AppResult};
