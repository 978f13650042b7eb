//! Missing-file detection for numbered sequences
//!
//! A folder of `part_01.mp3 .. part_12.mp3` with `part_05.mp3` absent has a
//! gap at 5. The report file lists a guessed name for every missing number.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::scanning::{numeric_token, sequence_number};
use crate::error::AppResult;

/// Name of the report written next to the scanned files
pub const GAP_REPORT_FILE: &str = "missing_files.txt";

/// Numbers missing from the sequence formed by the files' numeric tokens.
///
/// Returns every integer in `[min, max]` that no file carries. Empty when no
/// file has a token.
pub fn find_gaps<S: AsRef<str>>(file_names: &[S]) -> Vec<u64> {
    let present: BTreeSet<u64> = file_names
        .iter()
        .filter_map(|name| sequence_number(name.as_ref()))
        .collect();

    let (Some(&min), Some(&max)) = (present.first(), present.last()) else {
        return Vec::new();
    };

    (min..=max).filter(|n| !present.contains(n)).collect()
}

/// Guess the name of a missing file from a real one.
///
/// The numeric token of `template` is replaced by the plain decimal `number`,
/// so `part_07.mp3` with 5 gives `part_5.mp3`.
pub fn placeholder_name(template: &str, number: u64) -> Option<String> {
    let (start, end, _) = numeric_token(template)?;
    Some(format!("{}{}{}", &template[..start], number, &template[end..]))
}

/// Write the report of missing files into `folder`, replacing any earlier report.
///
/// The first file with a numeric token is the naming template. Returns the
/// path of the written report.
pub fn write_gap_report<S: AsRef<str>>(
    folder: &Path,
    file_names: &[S],
    missing: &[u64],
) -> AppResult<PathBuf> {
    let template = file_names
        .iter()
        .map(|n| n.as_ref())
        .find(|n| sequence_number(n).is_some());

    let mut contents = String::new();
    if let Some(template) = template {
        for &number in missing {
            if let Some(name) = placeholder_name(template, number) {
                contents.push_str(&name);
                contents.push('\n');
            }
        }
    }

    let report_path = folder.join(GAP_REPORT_FILE);
    fs::write(&report_path, contents)?;
    log::info!("Wrote missing-file report: {}", report_path.display());

    Ok(report_path)
}
