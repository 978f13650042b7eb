//! Session controller
//!
//! [`App`] owns the session state and the tool configuration and implements
//! [`CommandHandler`], so every front-end drives the same behavior.

use std::path::{Path, PathBuf};

use crate::audio::formats::{
    BITRATE_PRESETS, CHANNEL_PRESETS, OUTPUT_FORMATS, SAMPLE_RATE_PRESETS, codecs_for,
    is_codec_allowed,
};
use crate::commands::{Command, CommandHandler, Flow, HELP, Setting, dispatch};
use crate::conversion::{Orchestrator, Toolchain, ToolRunner};
use crate::core::{SessionState, find_gaps, scan_folder, write_gap_report};
use crate::error::{AppError, AppResult};
use crate::settings::{AppConfig, ConversionConfig};
use crate::ui::Frontend;

/// One user session
pub struct App<F: Frontend> {
    state: SessionState,
    tools: Toolchain,
    runner: Box<dyn ToolRunner>,
    config_path: Option<PathBuf>,
    frontend: F,
    /// ffmpeg version line once the tool answered
    tool_version: Option<String>,
}

impl<F: Frontend> App<F> {
    /// Start a session with the record stored at `config_path` (defaults when absent)
    pub fn new(
        config_path: Option<PathBuf>,
        tools: Toolchain,
        runner: Box<dyn ToolRunner>,
        frontend: F,
    ) -> Self {
        let config = config_path
            .as_deref()
            .map(AppConfig::load)
            .unwrap_or_default();

        Self {
            state: SessionState::new(config),
            tools,
            runner,
            config_path,
            frontend,
            tool_version: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// Check that ffmpeg answers. A missing tool disables merge and convert
    /// but the session goes on.
    pub fn check_tools(&mut self) -> bool {
        match self.ensure_tools() {
            Ok(()) => true,
            Err(e) => {
                self.report_error(&e);
                false
            }
        }
    }

    /// Run commands in order, then shut down normally so the record is saved.
    /// Stops at the first failing command without saving.
    pub fn run_batch(&mut self, commands: Vec<Command>) -> AppResult<()> {
        for command in commands {
            if dispatch(self, command)? == Flow::Exit {
                return Ok(());
            }
        }
        dispatch(self, Command::Exit)?;
        Ok(())
    }

    /// Show an error to the user and record it in the log file
    pub fn report_error(&mut self, error: &AppError) {
        log::error!("{}", error);
        self.frontend.error(&error.to_string());
    }

    fn log(&mut self, message: &str) {
        log::info!("{}", message);
        self.frontend.log(message);
    }

    fn ensure_tools(&mut self) -> AppResult<()> {
        if self.tool_version.is_some() {
            return Ok(());
        }

        let version = Orchestrator::new(&self.tools, self.runner.as_ref()).check_version()?;
        self.log(&format!("Using {}", version));
        self.tool_version = Some(version);
        Ok(())
    }

    fn save_config(&mut self) -> AppResult<PathBuf> {
        let path = self
            .config_path
            .clone()
            .ok_or_else(|| AppError::ConfigIo("no configuration directory available".to_string()))?;
        self.state.config.save(&path)?;
        log::debug!("Configuration saved to {:?}", path);
        Ok(path)
    }

    /// Scan `folder` into the session, reporting to the front-end
    fn rescan(&mut self, folder: &Path) -> AppResult<Vec<String>> {
        let scan = match scan_folder(folder) {
            Ok(scan) => scan,
            Err(e) => {
                self.state.set_scan(folder, Default::default());
                self.frontend.show_files(&[]);
                return Err(e);
            }
        };

        self.state.set_folder(folder);
        let names = scan.file_names();
        self.state.set_scan(folder, scan);
        self.frontend.show_files(&names);
        self.log(&format!("Found {} audio files", names.len()));
        Ok(names)
    }

    /// The scanned list, scanning the last folder first when nothing is loaded
    fn current_files(&mut self, folder: Option<&Path>) -> AppResult<(PathBuf, Vec<String>)> {
        if let Some(folder) = folder {
            let names = self.rescan(folder)?;
            return Ok((folder.to_path_buf(), names));
        }

        if let Some(folder) = self.state.folder.clone() {
            return Ok((folder, self.state.file_names()));
        }

        let folder = self
            .state
            .resolve_folder(None)
            .ok_or(AppError::NoFolderSelected)?;
        let names = self.rescan(&folder)?;
        Ok((folder, names))
    }

    fn resolve_probe_path(&self, file: &str) -> PathBuf {
        let path = PathBuf::from(file);
        if path.is_absolute() || path.exists() {
            return path;
        }
        match &self.state.folder {
            Some(folder) => folder.join(file),
            None => path,
        }
    }
}

fn check_format(format: &str) -> AppResult<()> {
    if OUTPUT_FORMATS.contains(&format) {
        return Ok(());
    }
    Err(AppError::InvalidSetting(format!(
        "unsupported format '{}', choose one of {}",
        format,
        OUTPUT_FORMATS.join(", ")
    )))
}

fn join_numbers(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl<F: Frontend> CommandHandler for App<F> {
    fn on_scan(&mut self, folder: Option<&Path>, check_missing: Option<bool>) -> AppResult<()> {
        let folder = self
            .state
            .resolve_folder(folder)
            .ok_or(AppError::NoFolderSelected)?;

        if let Some(flag) = check_missing {
            self.state.config.check_missing_files = flag;
        }

        self.log(&format!("Scanning folder: {}", folder.display()));
        let names = self.rescan(&folder)?;

        if !self.state.config.check_missing_files || names.is_empty() {
            return Ok(());
        }

        let missing = find_gaps(&names);
        if missing.is_empty() {
            self.log("No missing files in the sequence");
        } else {
            let report = write_gap_report(&folder, &names, &missing)?;
            self.log(&format!(
                "Found {} missing files, list written to {}",
                missing.len(),
                report.display()
            ));
        }
        self.state.scan.gaps = Some(missing);
        Ok(())
    }

    fn on_merge(&mut self, folder: Option<&Path>) -> AppResult<()> {
        let folder = self
            .state
            .resolve_folder(folder)
            .ok_or(AppError::NoFolderSelected)?;

        let names = self.rescan(&folder)?;
        if names.is_empty() {
            return Err(AppError::NoAudioFiles(folder));
        }
        self.ensure_tools()?;

        let orchestrator = Orchestrator::new(&self.tools, self.runner.as_ref());
        let outcome = orchestrator.merge(&folder, &names, &mut self.frontend)?;

        let file_name = outcome
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut message = format!("Files merged into {}", file_name);
        if outcome.reencoded {
            message.push_str(" (re-encoded)");
        }
        if !outcome.deleted.is_empty() {
            message.push_str(&format!("\nDeleted {} original files", outcome.deleted.len()));
        }
        for (name, reason) in &outcome.delete_failures {
            message.push_str(&format!("\nCould not delete {}: {}", name, reason));
        }
        self.frontend.notify(&message);

        // Deleted originals must disappear from the list
        if !outcome.deleted.is_empty() {
            self.rescan(&folder)?;
        }
        Ok(())
    }

    fn on_convert(&mut self, folder: Option<&Path>, selection: &[String]) -> AppResult<()> {
        let (folder, scanned) = self.current_files(folder)?;

        let files = if selection.is_empty() {
            scanned
        } else {
            for name in selection {
                if !scanned.contains(name) {
                    return Err(AppError::UnknownFile(name.clone()));
                }
            }
            selection.to_vec()
        };
        if files.is_empty() {
            return Err(AppError::NoAudioFiles(folder));
        }
        self.ensure_tools()?;

        let config = self.state.conversion().clone();
        let orchestrator = Orchestrator::new(&self.tools, self.runner.as_ref());
        let report = orchestrator.convert(&folder, &files, &config, &mut self.frontend)?;
        report.check()?;

        self.frontend.notify(&format!(
            "{}\nOutput folder: {}",
            report.summary(),
            report.output_dir.display()
        ));

        if let Err(e) = self.save_config() {
            self.report_error(&e);
        }
        Ok(())
    }

    fn on_probe(&mut self, file: &str) -> AppResult<()> {
        let path = self.resolve_probe_path(file);
        let orchestrator = Orchestrator::new(&self.tools, self.runner.as_ref());
        match orchestrator.probe(&path) {
            Ok(info) => {
                self.frontend.show_info(&info);
                Ok(())
            }
            Err(e) => {
                self.log(&format!("No info available for {}", file));
                Err(e)
            }
        }
    }

    fn on_set(&mut self, setting: Setting) -> AppResult<()> {
        match setting {
            Setting::Preset(format) => {
                check_format(&format)?;
                *self.state.conversion_mut() = ConversionConfig::for_format(&format);
            }
            Setting::Format(format) => {
                check_format(&format)?;
                let previous_codec = self.state.conversion().codec.clone();
                self.state.conversion_mut().set_format(&format);
                let codec = self.state.conversion().codec.clone();
                if codec != previous_codec {
                    self.log(&format!("Codec changed to {} for {}", codec, format));
                }
            }
            Setting::Codec(codec) => {
                let format = self.state.conversion().format.clone();
                if !is_codec_allowed(&format, &codec) {
                    return Err(AppError::InvalidSetting(format!(
                        "codec '{}' does not fit {}, choose one of {}",
                        codec,
                        format,
                        codecs_for(&format).join(", ")
                    )));
                }
                self.state.conversion_mut().codec = codec;
            }
            Setting::Bitrate(bitrate) => {
                if bitrate.trim().is_empty() {
                    return Err(AppError::InvalidSetting("bitrate cannot be empty".to_string()));
                }
                self.state.conversion_mut().bitrate = bitrate.trim().to_string();
            }
            Setting::Channels(0) => {
                return Err(AppError::InvalidSetting("channels must be at least 1".to_string()));
            }
            Setting::Channels(channels) => self.state.conversion_mut().channels = channels,
            Setting::SampleRate(0) => {
                return Err(AppError::InvalidSetting(
                    "sample rate must be at least 1".to_string(),
                ));
            }
            Setting::SampleRate(rate) => self.state.conversion_mut().sample_rate = rate,
            Setting::Start(start) => self.state.conversion_mut().start_time = start,
            Setting::End(end) => self.state.conversion_mut().end_time = end,
            Setting::CheckMissing(flag) => self.state.config.check_missing_files = flag,
        }

        self.log(&format!("Settings: {}", self.state.conversion().summary()));
        Ok(())
    }

    fn on_show_config(&mut self) -> AppResult<()> {
        let config = &self.state.config;
        let lines = [
            format!("Last folder:        {}", config.last_folder),
            format!("Check missing:      {}", config.check_missing_files),
            format!("Conversion:         {}", config.convert_config.summary()),
            format!(
                "Trim:               {} - {}",
                config.convert_config.trim_start().unwrap_or("start"),
                config.convert_config.trim_end().unwrap_or("end")
            ),
            format!("Formats:            {}", OUTPUT_FORMATS.join(" ")),
            format!(
                "Codecs for {}:{}{}",
                config.convert_config.format,
                " ".repeat(8usize.saturating_sub(config.convert_config.format.len())),
                codecs_for(&config.convert_config.format).join(" ")
            ),
            format!("Bitrates:           {}", BITRATE_PRESETS.join(" ")),
            format!("Channels:           {}", join_numbers(CHANNEL_PRESETS)),
            format!("Sample rates:       {}", join_numbers(SAMPLE_RATE_PRESETS)),
        ];
        self.frontend.notify(&lines.join("\n"));
        Ok(())
    }

    fn on_save_config(&mut self) -> AppResult<()> {
        let path = self.save_config()?;
        self.frontend
            .notify(&format!("Settings saved to {}", path.display()));
        Ok(())
    }

    fn on_help(&mut self) -> AppResult<()> {
        self.frontend.notify(HELP);
        Ok(())
    }

    fn on_exit(&mut self) -> AppResult<()> {
        if let Err(e) = self.save_config() {
            self.report_error(&e);
        }
        log::info!("Session ended");
        Ok(())
    }
}
