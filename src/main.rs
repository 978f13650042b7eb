//! Audio Processor - command line and interactive shell
//!
//! Without a subcommand an interactive shell is started. The subcommands run a
//! single operation and exit non-zero if it fails.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use audio_processor::App;
use audio_processor::commands::{Command, Flow, Setting, dispatch};
use audio_processor::conversion::{SystemRunner, Toolchain};
use audio_processor::logging;
use audio_processor::settings::default_config_path;
use audio_processor::ui::{ConfirmPolicy, ConsoleFrontend, Frontend};

type Console = ConsoleFrontend<io::StdinLock<'static>, io::Stdout>;

/// Merge, convert and check numbered audio files with ffmpeg
#[derive(Parser)]
#[command(name = "Audio-Processor")]
#[command(version)]
#[command(about = "Merge, convert and check numbered audio files with ffmpeg", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    /// ffprobe executable
    #[arg(long, global = true)]
    ffprobe: Option<PathBuf>,

    /// Answer yes to every question
    #[arg(short, long, global = true, conflicts_with = "no")]
    yes: bool,

    /// Answer no to every question
    #[arg(long, global = true)]
    no: bool,

    /// Also print the debug log to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the audio files of a folder in sequence order
    Scan {
        folder: PathBuf,

        /// Write missing_files.txt for gaps in the numbering
        #[arg(long)]
        check_missing: bool,
    },

    /// Merge every audio file of a folder into one file
    Merge { folder: PathBuf },

    /// Convert audio files into converted_<format>
    Convert {
        folder: PathBuf,

        /// Files to convert (all audio files when omitted)
        files: Vec<String>,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Show the metadata of one audio file
    Probe { file: PathBuf },

    /// Interactive shell (the default)
    Shell,
}

#[derive(Args)]
struct ConvertOptions {
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    codec: Option<String>,
    #[arg(long)]
    bitrate: Option<String>,
    #[arg(long)]
    channels: Option<u32>,
    #[arg(long)]
    sample_rate: Option<u32>,
    /// Trim start, e.g. 00:00:30
    #[arg(long)]
    start: Option<String>,
    /// Trim end, e.g. 00:02:00
    #[arg(long)]
    end: Option<String>,
}

impl ConvertOptions {
    /// Format first, so a codec given alongside it is checked against the new format
    fn into_settings(self) -> Vec<Setting> {
        let mut settings = Vec::new();
        settings.extend(self.format.map(|f| Setting::Format(f.to_lowercase())));
        settings.extend(self.codec.map(Setting::Codec));
        settings.extend(self.bitrate.map(Setting::Bitrate));
        settings.extend(self.channels.map(Setting::Channels));
        settings.extend(self.sample_rate.map(Setting::SampleRate));
        settings.extend(self.start.map(Setting::Start));
        settings.extend(self.end.map(Setting::End));
        settings
    }
}

fn one_shot_commands(command: Commands) -> Vec<Command> {
    match command {
        Commands::Scan {
            folder,
            check_missing,
        } => vec![Command::Scan {
            folder: Some(folder),
            check_missing: check_missing.then_some(true),
        }],
        Commands::Merge { folder } => vec![Command::Merge {
            folder: Some(folder),
        }],
        Commands::Convert {
            folder,
            files,
            options,
        } => {
            let mut commands: Vec<Command> =
                options.into_settings().into_iter().map(Command::Set).collect();
            commands.push(Command::Convert {
                folder: Some(folder),
                selection: files,
            });
            commands
        }
        Commands::Probe { file } => vec![Command::Probe {
            file: file.to_string_lossy().to_string(),
        }],
        Commands::Shell => Vec::new(),
    }
}

fn run_once(app: &mut App<Console>, commands: Vec<Command>) -> ExitCode {
    match app.run_batch(commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            app.report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run_shell(app: &mut App<Console>) -> ExitCode {
    app.check_tools();
    app.frontend_mut()
        .notify("Audio Processor. Type 'help' for commands.");

    loop {
        let line = match app.frontend_mut().read_line("audio> ") {
            Ok(Some(line)) => line,
            Ok(None) => {
                // End of input behaves like quit
                if let Err(e) = dispatch(app, Command::Exit) {
                    app.report_error(&e);
                }
                break;
            }
            Err(e) => {
                log::error!("Failed to read command: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                app.frontend_mut().error(&message);
                continue;
            }
        };

        match dispatch(app, command) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => app.report_error(&e),
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let policy = if cli.yes {
        ConfirmPolicy::AlwaysYes
    } else if cli.no {
        ConfirmPolicy::AlwaysNo
    } else {
        ConfirmPolicy::Ask
    };

    let config_path = cli.config.or_else(default_config_path);
    let tools = Toolchain::locate(cli.ffmpeg, cli.ffprobe);
    log::debug!("Using tools: {:?}", tools);

    let mut app = App::new(
        config_path,
        tools,
        Box::new(SystemRunner),
        ConsoleFrontend::stdio(policy),
    );

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(&mut app),
        command => run_once(&mut app, one_shot_commands(command)),
    }
}
