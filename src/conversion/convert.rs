//! Per-file format conversion with ffmpeg

use std::path::{Path, PathBuf};

use super::{Orchestrator, ffmpeg_path_string, render_command, report};
use crate::error::{AppError, AppResult, ExitState};
use crate::settings::ConversionConfig;
use crate::ui::Frontend;

/// Result of converting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub file: String,
    pub output: PathBuf,
    pub success: bool,
    pub exit: ExitState,
    /// ffmpeg's stderr when the conversion failed
    pub diagnostic: String,
}

/// Outcome of a conversion batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub output_dir: PathBuf,
    /// Number of files in the batch
    pub total: usize,
    /// One entry per attempted file. A failure is always the last entry.
    pub outcomes: Vec<ConversionOutcome>,
}

impl ConvertReport {
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failure(&self) -> Option<&ConversionOutcome> {
        self.outcomes.iter().find(|o| !o.success)
    }

    /// "Converted 3/3 files"
    pub fn summary(&self) -> String {
        format!("Converted {}/{} files", self.converted(), self.total)
    }

    /// The batch as an error if it stopped on a failure
    pub fn check(&self) -> AppResult<()> {
        match self.failure() {
            Some(failed) => Err(AppError::ConvertFailed {
                file: failed.file.clone(),
                exit: failed.exit,
                stderr: failed.diagnostic.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// `<folder>/converted_<format>`
pub fn output_dir_for(folder: &Path, format: &str) -> PathBuf {
    folder.join(format!("converted_{}", format))
}

/// ffmpeg arguments converting `input` to `output` with `config`
pub fn conversion_args(input: &Path, output: &Path, config: &ConversionConfig) -> Vec<String> {
    let mut args = vec!["-i".to_string(), ffmpeg_path_string(input)];

    if let Some(start) = config.trim_start() {
        args.extend(["-ss".to_string(), start.to_string()]);
    }
    if let Some(end) = config.trim_end() {
        args.extend(["-to".to_string(), end.to_string()]);
    }

    args.extend([
        "-c:a".to_string(),
        config.codec.clone(),
        "-b:a".to_string(),
        config.bitrate.clone(),
        "-ac".to_string(),
        config.channels.to_string(),
        "-ar".to_string(),
        config.sample_rate.to_string(),
        "-y".to_string(),
        ffmpeg_path_string(output),
    ]);
    args
}

impl Orchestrator<'_> {
    /// Convert `files` from `folder` into `converted_<format>`.
    ///
    /// Files are converted one at a time. The first failure stops the batch;
    /// outputs written before it stay on disk.
    pub fn convert(
        &self,
        folder: &Path,
        files: &[String],
        config: &ConversionConfig,
        frontend: &mut dyn Frontend,
    ) -> AppResult<ConvertReport> {
        if files.is_empty() {
            return Err(AppError::NoAudioFiles(folder.to_path_buf()));
        }

        let output_dir = output_dir_for(folder, &config.format);
        std::fs::create_dir_all(&output_dir)?;

        let mut report_card = ConvertReport {
            output_dir: output_dir.clone(),
            total: files.len(),
            outcomes: Vec::with_capacity(files.len()),
        };

        for file in files {
            let input = folder.join(file);
            let stem = Path::new(file)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file.clone());
            let output = output_dir.join(format!("{}.{}", stem, config.format));

            report(frontend, &format!("Converting: {} -> {}", file, output.display()));
            report(frontend, &format!("Parameters - {}", config.summary()));
            if let Some(start) = config.trim_start() {
                report(frontend, &format!("Start time: {}", start));
            }
            if let Some(end) = config.trim_end() {
                report(frontend, &format!("End time: {}", end));
            }

            let args = conversion_args(&input, &output, config);
            report(
                frontend,
                &format!("Running: {}", render_command(&self.tools.ffmpeg, &args)),
            );
            let result = self.run(&self.tools.ffmpeg, &args)?;

            let success = result.success();
            report_card.outcomes.push(ConversionOutcome {
                file: file.clone(),
                output,
                success,
                exit: result.exit,
                diagnostic: if success { String::new() } else { result.stderr },
            });

            if !success {
                report(frontend, &format!("Conversion failed: {} ({})", file, result.exit));
                log::warn!("Conversion batch stopped at {}", file);
                return Ok(report_card);
            }
            report(frontend, &format!("Converted: {}", file));
        }

        report(frontend, &format!("Conversion finished. {}", report_card.summary()));
        Ok(report_card)
    }
}
