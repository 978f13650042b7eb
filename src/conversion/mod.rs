//! Audio orchestration module
//!
//! Probes, merges and converts audio files by running ffmpeg/ffprobe.

mod convert;
mod merge;
mod probe;
mod runner;

pub use convert::{ConversionOutcome, ConvertReport, output_dir_for};
pub use merge::{CONCAT_LIST_FILE, MergeOutcome, MergeStage, merged_file_name};
pub use probe::{AudioInfo, format_duration};
pub use runner::{SystemRunner, ToolOutput, ToolRunner, render_command};

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::ui::Frontend;

/// Environment variable overriding the ffmpeg location
pub const FFMPEG_ENV: &str = "AUDIO_PROCESSOR_FFMPEG";
/// Environment variable overriding the ffprobe location
pub const FFPROBE_ENV: &str = "AUDIO_PROCESSOR_FFPROBE";

/// Locations of the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl Toolchain {
    /// Find ffmpeg and ffprobe.
    ///
    /// Explicit paths win, then the environment, then a bundled copy under
    /// `resources/bin`, then whatever `PATH` resolves.
    pub fn locate(ffmpeg: Option<PathBuf>, ffprobe: Option<PathBuf>) -> Self {
        Self {
            ffmpeg: find_tool("ffmpeg", ffmpeg, FFMPEG_ENV),
            ffprobe: find_tool("ffprobe", ffprobe, FFPROBE_ENV),
        }
    }
}

fn find_tool(name: &str, explicit: Option<PathBuf>, env_var: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    if let Ok(path) = std::env::var(env_var)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }

    let file_name = format!("{}{}", name, std::env::consts::EXE_SUFFIX);

    // Bundled next to the executable (release) or in the source tree (development)
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        candidates.push(exe_dir.join("resources").join("bin").join(&file_name));
    }
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        candidates.push(PathBuf::from(manifest_dir).join("resources").join("bin").join(&file_name));
    }

    for candidate in candidates {
        if candidate.is_file() {
            log::debug!("Found {} at bundled path: {:?}", name, candidate);
            return candidate;
        }
    }

    PathBuf::from(file_name)
}

/// Path as ffmpeg expects it: forward slashes on every platform
pub fn ffmpeg_path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Send a line to the front-end's log pane and to the log file
pub(crate) fn report(frontend: &mut dyn Frontend, message: &str) {
    log::debug!("{}", message);
    frontend.log(message);
}

/// Runs the external tools on behalf of the commands
pub struct Orchestrator<'a> {
    tools: &'a Toolchain,
    runner: &'a dyn ToolRunner,
}

impl<'a> Orchestrator<'a> {
    pub fn new(tools: &'a Toolchain, runner: &'a dyn ToolRunner) -> Self {
        Self { tools, runner }
    }

    /// Check that ffmpeg runs, returning the first line of its version banner
    pub fn check_version(&self) -> AppResult<String> {
        let output = self.run(&self.tools.ffmpeg, &["-version".to_string()])?;
        if !output.success() {
            return Err(AppError::ToolNotFound(format!(
                "{} -version failed ({})",
                self.tools.ffmpeg.display(),
                output.exit
            )));
        }
        Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Run a tool, mapping a missing binary to `ToolNotFound`
    fn run(&self, program: &Path, args: &[String]) -> AppResult<ToolOutput> {
        self.runner.run(program, args).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ToolNotFound(program.display().to_string())
            } else {
                AppError::Io(e)
            }
        })
    }
}
