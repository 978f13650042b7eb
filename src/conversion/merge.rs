//! Concatenating a folder's files into one with ffmpeg's concat demuxer
//!
//! A stream copy is tried first. If ffmpeg rejects it (usually because the
//! inputs use different codecs), the user may allow one retry that re-encodes.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Orchestrator, ToolOutput, ffmpeg_path_string, render_command, report};
use crate::audio::{extension_of, reencode_args};
use crate::error::{AppError, AppResult};
use crate::ui::Frontend;

/// Name of the concat list written next to the inputs
pub const CONCAT_LIST_FILE: &str = "files.txt";

const DEFAULT_EXTENSION: &str = "mp3";

/// Progress of a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    Idle,
    ListBuilt,
    CopyAttempted,
    ReencodeOffered,
    ReencodeAttempted,
    Success,
    Failed,
}

/// Result of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub output: PathBuf,
    /// True when the stream copy failed and the files were re-encoded
    pub reencoded: bool,
    /// Inputs deleted after the merge
    pub deleted: Vec<String>,
    /// Inputs that could not be deleted, with the reason
    pub delete_failures: Vec<(String, String)>,
    /// Stages passed through, in order
    pub stages: Vec<MergeStage>,
}

/// `merged_<YYYYmmdd_HHMMSS>.<ext>`
pub fn merged_file_name(extension: &str, at: NaiveDateTime) -> String {
    format!("merged_{}.{}", at.format("%Y%m%d_%H%M%S"), extension)
}

/// Output extension of a merge: the first input's, or mp3
fn output_extension(files: &[String]) -> String {
    files
        .first()
        .map(|f| extension_of(f))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Quote a path for a concat list entry
fn concat_entry(path: &Path) -> String {
    format!("file '{}'", ffmpeg_path_string(path).replace('\'', r"'\''"))
}

/// Write the concat list for `files` into `folder` and return its path
pub fn write_concat_list(
    folder: &Path,
    files: &[String],
    frontend: &mut dyn Frontend,
) -> AppResult<PathBuf> {
    let list_path = folder.join(CONCAT_LIST_FILE);
    report(frontend, &format!("Creating file list: {}", list_path.display()));

    let mut contents = String::new();
    for file in files {
        let full_path = std::path::absolute(folder.join(file))?;
        let entry = concat_entry(&full_path);
        report(frontend, &format!("Adding to list: {}", ffmpeg_path_string(&full_path)));
        contents.push_str(&entry);
        contents.push('\n');
    }

    fs::write(&list_path, &contents)?;

    let preview: Vec<&str> = contents.lines().take(5).collect();
    report(
        frontend,
        &format!(
            "File list written ({} bytes), first lines: {}",
            contents.len(),
            preview.join(" | ")
        ),
    );

    Ok(list_path)
}

struct StageLog(Vec<MergeStage>);

impl StageLog {
    fn enter(&mut self, stage: MergeStage) {
        log::debug!(
            "merge: {:?} -> {:?}",
            self.0.last().copied().unwrap_or(MergeStage::Idle),
            stage
        );
        self.0.push(stage);
    }
}

impl Orchestrator<'_> {
    /// Merge `files` (in order) from `folder` into one timestamped file
    pub fn merge(
        &self,
        folder: &Path,
        files: &[String],
        frontend: &mut dyn Frontend,
    ) -> AppResult<MergeOutcome> {
        let now = chrono::Local::now().naive_local();
        self.merge_at(folder, files, frontend, now)
    }

    /// Same as [`merge`](Self::merge) with a fixed timestamp for the output name
    pub fn merge_at(
        &self,
        folder: &Path,
        files: &[String],
        frontend: &mut dyn Frontend,
        at: NaiveDateTime,
    ) -> AppResult<MergeOutcome> {
        if files.is_empty() {
            return Err(AppError::NoAudioFiles(folder.to_path_buf()));
        }

        let mut stages = StageLog(vec![MergeStage::Idle]);

        let list_path = write_concat_list(folder, files, frontend)?;
        stages.enter(MergeStage::ListBuilt);

        let extension = output_extension(files);
        if files.iter().any(|f| extension_of(f) != extension) {
            log::warn!("Merging files with mixed extensions into .{}", extension);
            report(
                frontend,
                &format!("Warning: inputs have mixed extensions; output will be .{}", extension),
            );
        }
        report(frontend, &format!("Output format: {}", extension));

        let output = folder.join(merged_file_name(&extension, at));
        let input_args = vec![
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            ffmpeg_path_string(&list_path),
        ];
        let output_arg = ffmpeg_path_string(&output);

        let mut copy_args = input_args.clone();
        copy_args.extend(["-c".to_string(), "copy".to_string(), output_arg.clone()]);

        report(frontend, "Starting lossless merge...");
        let copy = self.run_logged(&copy_args, frontend)?;
        stages.enter(MergeStage::CopyAttempted);

        let mut reencoded = false;
        if !copy.success() {
            report(frontend, &format!("Lossless merge failed: {}", copy.stderr.trim()));

            stages.enter(MergeStage::ReencodeOffered);
            let consent = frontend.confirm(
                "Lossless merge failed. The files may use different codecs.\n\
                 Retry the merge with re-encoding?",
            );
            if !consent {
                stages.enter(MergeStage::Failed);
                return Err(AppError::MergeCopyFailed {
                    exit: copy.exit,
                    stderr: copy.stderr,
                });
            }

            // ffmpeg would stop at its overwrite prompt on a partial copy output
            if output.exists() {
                match fs::remove_file(&output) {
                    Ok(()) => log::debug!("Removed partial output {:?}", output),
                    Err(e) => log::warn!("Failed to remove partial output {:?}: {}", output, e),
                }
            }

            report(frontend, "Retrying merge with re-encoding");
            let mut reencode = input_args;
            reencode.extend(reencode_args(&extension));
            reencode.push(output_arg);

            let retry = self.run_logged(&reencode, frontend)?;
            stages.enter(MergeStage::ReencodeAttempted);
            if !retry.success() {
                report(frontend, &format!("Re-encoding merge failed: {}", retry.stderr.trim()));
                stages.enter(MergeStage::Failed);
                return Err(AppError::MergeReencodeFailed {
                    exit: retry.exit,
                    stderr: retry.stderr,
                });
            }
            reencoded = true;
        }

        stages.enter(MergeStage::Success);
        report(frontend, &format!("Merged into {}", output.display()));

        let mut outcome = MergeOutcome {
            output,
            reencoded,
            deleted: Vec::new(),
            delete_failures: Vec::new(),
            stages: stages.0,
        };

        if frontend.confirm("Merge succeeded. Delete the original audio files?") {
            for file in files {
                match fs::remove_file(folder.join(file)) {
                    Ok(()) => {
                        report(frontend, &format!("Deleted: {}", file));
                        outcome.deleted.push(file.clone());
                    }
                    Err(e) => {
                        log::warn!("Failed to delete {}: {}", file, e);
                        report(frontend, &format!("Failed to delete {}: {}", file, e));
                        outcome.delete_failures.push((file.clone(), e.to_string()));
                    }
                }
            }
        }

        Ok(outcome)
    }

    fn run_logged(&self, args: &[String], frontend: &mut dyn Frontend) -> AppResult<ToolOutput> {
        report(
            frontend,
            &format!("Running: {}", render_command(&self.tools.ffmpeg, args)),
        );
        self.run(&self.tools.ffmpeg, args)
    }
}
