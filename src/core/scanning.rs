//! Folder scanning and sequence ordering
//!
//! Lists the audio files directly inside a folder and orders them by the
//! number embedded in their names, so `track2.mp3` comes before `track10.mp3`.

use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

use crate::audio::is_audio_file;
use crate::error::{AppError, AppResult};

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// The longest run of ASCII digits in a name, with its byte range.
///
/// When several runs share the longest length the first one wins.
pub fn longest_digit_run(name: &str) -> Option<(usize, usize, &str)> {
    let mut best: Option<regex::Match<'_>> = None;
    for m in digit_runs().find_iter(name) {
        if best.is_none_or(|b| m.len() > b.len()) {
            best = Some(m);
        }
    }
    best.map(|m| (m.start(), m.end(), m.as_str()))
}

/// The numeric token of a file name: the longest digit run in its stem.
///
/// The extension is skipped so `mp3`/`m4a` never contribute a number. The
/// returned range indexes into the full name.
pub fn numeric_token(name: &str) -> Option<(usize, usize, &str)> {
    let base = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let stem_end = match name[base..].rfind('.') {
        Some(dot) if dot > 0 => base + dot,
        _ => name.len(),
    };
    longest_digit_run(&name[..stem_end])
}

/// Sequence number of a file: its numeric token parsed as an integer.
///
/// Tokens too long to fit in a `u64` count as no number at all.
pub fn sequence_number(name: &str) -> Option<u64> {
    numeric_token(name).and_then(|(_, _, digits)| digits.parse().ok())
}

/// An audio file found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileEntry {
    pub file_name: String,
    pub directory: PathBuf,
    /// Numeric token extracted from the file name
    pub sequence: Option<u64>,
}

impl AudioFileEntry {
    pub fn new(directory: &Path, file_name: String) -> Self {
        let sequence = sequence_number(&file_name);
        Self {
            file_name,
            directory: directory.to_path_buf(),
            sequence,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Ordered files from one scan, plus the gap report when one was requested
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub entries: Vec<AudioFileEntry>,
    pub gaps: Option<Vec<u64>>,
}

impl ScanResult {
    pub fn file_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.file_name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort entries by sequence number.
///
/// Ties are broken by name. If any entry has no number, the whole list falls
/// back to plain lexical order.
pub fn sort_entries(entries: &mut [AudioFileEntry]) {
    if entries.iter().all(|e| e.sequence.is_some()) {
        entries.sort_by(|a, b| match a.sequence.cmp(&b.sequence) {
            Ordering::Equal => a.file_name.cmp(&b.file_name),
            other => other,
        });
    } else {
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }
}

/// Scan a folder for audio files (not recursive)
///
/// Only regular files with a recognized audio extension are kept.
pub fn scan_folder(path: &Path) -> AppResult<ScanResult> {
    if !path.is_dir() {
        return Err(AppError::DirectoryNotFound(path.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(AudioFileEntry::new(path, name));
        }
    }

    sort_entries(&mut entries);
    log::debug!("Scanned {}: {} audio files", path.display(), entries.len());

    Ok(ScanResult {
        entries,
        gaps: None,
    })
}

/// Ordered audio file names in a folder. A missing folder yields an empty list.
pub fn scan(path: &Path) -> Vec<String> {
    scan_folder(path)
        .map(|result| result.file_names())
        .unwrap_or_default()
}
