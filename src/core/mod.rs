//! Core application logic and state
//!
//! This module contains:
//! - Folder scanning and sequence ordering
//! - Gap detection in numbered file sequences
//! - Session state passed between commands

mod gaps;
mod scanning;
mod state;

pub use gaps::{GAP_REPORT_FILE, find_gaps, placeholder_name, write_gap_report};
pub use scanning::{AudioFileEntry, ScanResult, scan, scan_folder, sequence_number};
pub use state::SessionState;
