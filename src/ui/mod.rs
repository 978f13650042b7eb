//! User-facing surface
//!
//! The core never talks to a terminal or window directly. It reports through
//! [`Frontend`], which the console front-end (and the test fakes) implement.

mod console;

pub use console::{ConsoleFrontend, ConfirmPolicy};

use crate::conversion::AudioInfo;

/// What the core needs from a user interface
pub trait Frontend {
    /// Append a line to the log pane
    fn log(&mut self, line: &str);
    /// Show an informational popup
    fn notify(&mut self, message: &str);
    /// Show an error popup
    fn error(&mut self, message: &str);
    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> bool;
    /// Replace the displayed file list
    fn show_files(&mut self, files: &[String]);
    /// Display the metadata of one file
    fn show_info(&mut self, info: &AudioInfo);
}
