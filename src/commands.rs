//! Typed commands and their dispatch
//!
//! Front-ends turn user input into a [`Command`]; [`dispatch`] routes it to a
//! [`CommandHandler`]. Nothing here knows about terminals or windows.

use std::path::{Path, PathBuf};

use crate::error::AppResult;

/// A change to one persisted setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// Replace the conversion parameters with the quick preset for a format
    Preset(String),
    Format(String),
    Codec(String),
    Bitrate(String),
    Channels(u32),
    SampleRate(u32),
    /// Trim start; empty clears it
    Start(String),
    /// Trim end; empty clears it
    End(String),
    CheckMissing(bool),
}

/// Everything a user can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan {
        folder: Option<PathBuf>,
        check_missing: Option<bool>,
    },
    Merge {
        folder: Option<PathBuf>,
    },
    /// Convert the named files, or every scanned file when `selection` is empty
    Convert {
        folder: Option<PathBuf>,
        selection: Vec<String>,
    },
    Probe {
        file: String,
    },
    Set(Setting),
    ShowConfig,
    SaveConfig,
    Help,
    Exit,
}

/// Whether the session goes on after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Receives dispatched commands
pub trait CommandHandler {
    fn on_scan(&mut self, folder: Option<&Path>, check_missing: Option<bool>) -> AppResult<()>;
    fn on_merge(&mut self, folder: Option<&Path>) -> AppResult<()>;
    fn on_convert(&mut self, folder: Option<&Path>, selection: &[String]) -> AppResult<()>;
    fn on_probe(&mut self, file: &str) -> AppResult<()>;
    fn on_set(&mut self, setting: Setting) -> AppResult<()>;
    fn on_show_config(&mut self) -> AppResult<()>;
    fn on_save_config(&mut self) -> AppResult<()>;
    fn on_help(&mut self) -> AppResult<()>;
    fn on_exit(&mut self) -> AppResult<()>;
}

/// Route one command to its handler method
pub fn dispatch<H: CommandHandler + ?Sized>(handler: &mut H, command: Command) -> AppResult<Flow> {
    match command {
        Command::Scan {
            folder,
            check_missing,
        } => handler.on_scan(folder.as_deref(), check_missing)?,
        Command::Merge { folder } => handler.on_merge(folder.as_deref())?,
        Command::Convert { folder, selection } => {
            handler.on_convert(folder.as_deref(), &selection)?
        }
        Command::Probe { file } => handler.on_probe(&file)?,
        Command::Set(setting) => handler.on_set(setting)?,
        Command::ShowConfig => handler.on_show_config()?,
        Command::SaveConfig => handler.on_save_config()?,
        Command::Help => handler.on_help()?,
        Command::Exit => {
            handler.on_exit()?;
            return Ok(Flow::Exit);
        }
    }
    Ok(Flow::Continue)
}

/// Shell help text
pub const HELP: &str = "\
Commands:
  scan [FOLDER] [--check-missing | --no-check-missing]
  merge [FOLDER]
  convert [FILE...]            convert the named files, or all scanned files
  info FILE                    show audio metadata
  set preset FORMAT            default parameters for a format
  set format|codec|bitrate|channels|rate|start|end VALUE
  set check-missing on|off
  config                       show current settings
  save                         save settings
  help
  quit";

/// Split a shell line into words, honoring double quotes
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_word {
        words.push(current);
    }
    Ok(words)
}

fn parse_on_off(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(format!("Expected on/off, got '{}'", other)),
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("{} must be a whole number, got '{}'", name, value))
}

fn parse_setting(words: &[String]) -> Result<Setting, String> {
    let (key, value) = match words {
        [key] if matches!(key.as_str(), "start" | "end") => (key.as_str(), ""),
        [key, value] => (key.as_str(), value.as_str()),
        _ => return Err("Usage: set KEY VALUE".to_string()),
    };

    Ok(match key {
        "preset" => Setting::Preset(value.to_lowercase()),
        "format" => Setting::Format(value.to_lowercase()),
        "codec" => Setting::Codec(value.to_string()),
        "bitrate" => Setting::Bitrate(value.to_string()),
        "channels" => Setting::Channels(parse_number("channels", value)?),
        "rate" | "sample-rate" | "sample_rate" => {
            Setting::SampleRate(parse_number("sample rate", value)?)
        }
        "start" => Setting::Start(value.to_string()),
        "end" => Setting::End(value.to_string()),
        "check-missing" => Setting::CheckMissing(parse_on_off(value)?),
        other => return Err(format!("Unknown setting '{}'", other)),
    })
}

impl Command {
    /// Parse a shell line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let words = split_words(line)?;
        let Some((verb, rest)) = words.split_first() else {
            return Ok(None);
        };

        let command = match verb.to_lowercase().as_str() {
            "scan" => {
                let mut folder = None;
                let mut check_missing = None;
                for word in rest {
                    match word.as_str() {
                        "--check-missing" => check_missing = Some(true),
                        "--no-check-missing" => check_missing = Some(false),
                        _ if folder.is_none() => folder = Some(PathBuf::from(word)),
                        _ => return Err("Usage: scan [FOLDER] [--check-missing]".to_string()),
                    }
                }
                Command::Scan {
                    folder,
                    check_missing,
                }
            }
            "merge" => match rest {
                [] => Command::Merge { folder: None },
                [folder] => Command::Merge {
                    folder: Some(PathBuf::from(folder)),
                },
                _ => return Err("Usage: merge [FOLDER]".to_string()),
            },
            "convert" => Command::Convert {
                folder: None,
                selection: rest.iter().filter(|w| w.as_str() != "--all").cloned().collect(),
            },
            "info" | "probe" => match rest {
                [file] => Command::Probe { file: file.clone() },
                _ => return Err("Usage: info FILE".to_string()),
            },
            "set" => Command::Set(parse_setting(rest)?),
            "config" | "show" => Command::ShowConfig,
            "save" => Command::SaveConfig,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Exit,
            other => return Err(format!("Unknown command '{}'. Type 'help'", other)),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl CommandHandler for Recorder {
        fn on_scan(&mut self, folder: Option<&Path>, check: Option<bool>) -> AppResult<()> {
            self.seen.push(format!("scan {:?} {:?}", folder, check));
            Ok(())
        }
        fn on_merge(&mut self, folder: Option<&Path>) -> AppResult<()> {
            self.seen.push(format!("merge {:?}", folder));
            Ok(())
        }
        fn on_convert(&mut self, _: Option<&Path>, selection: &[String]) -> AppResult<()> {
            self.seen.push(format!("convert {}", selection.len()));
            Ok(())
        }
        fn on_probe(&mut self, file: &str) -> AppResult<()> {
            self.seen.push(format!("probe {}", file));
            Ok(())
        }
        fn on_set(&mut self, setting: Setting) -> AppResult<()> {
            self.seen.push(format!("set {:?}", setting));
            Ok(())
        }
        fn on_show_config(&mut self) -> AppResult<()> {
            self.seen.push("config".to_string());
            Ok(())
        }
        fn on_save_config(&mut self) -> AppResult<()> {
            self.seen.push("save".to_string());
            Ok(())
        }
        fn on_help(&mut self) -> AppResult<()> {
            Ok(())
        }
        fn on_exit(&mut self) -> AppResult<()> {
            self.seen.push("exit".to_string());
            Ok(())
        }
    }

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_split_words_with_quotes() {
        assert_eq!(
            split_words(r#"scan "/music/My Album"  --check-missing"#).unwrap(),
            ["scan", "/music/My Album", "--check-missing"]
        );
        assert_eq!(split_words(r#"set end """#).unwrap(), ["set", "end", ""]);
        assert!(split_words(r#"scan "/open"#).is_err());
    }

    #[test]
    fn test_parse_scan() {
        assert_eq!(
            parse("scan /music --check-missing"),
            Command::Scan {
                folder: Some(PathBuf::from("/music")),
                check_missing: Some(true)
            }
        );
        assert_eq!(
            parse("SCAN"),
            Command::Scan {
                folder: None,
                check_missing: None
            }
        );
    }

    #[test]
    fn test_parse_convert_selection() {
        assert_eq!(
            parse("convert a1.mp3 \"b 2.mp3\""),
            Command::Convert {
                folder: None,
                selection: vec!["a1.mp3".to_string(), "b 2.mp3".to_string()]
            }
        );
        assert_eq!(
            parse("convert --all"),
            Command::Convert {
                folder: None,
                selection: Vec::new()
            }
        );
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!(parse("set format FLAC"), Command::Set(Setting::Format("flac".to_string())));
        assert_eq!(parse("set preset OGG"), Command::Set(Setting::Preset("ogg".to_string())));
        assert_eq!(parse("set rate 48000"), Command::Set(Setting::SampleRate(48000)));
        assert_eq!(parse("set end"), Command::Set(Setting::End(String::new())));
        assert_eq!(parse("set check-missing on"), Command::Set(Setting::CheckMissing(true)));
        assert!(Command::parse("set channels two").is_err());
        assert!(Command::parse("set volume 11").is_err());
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("burn").is_err());
    }

    #[test]
    fn test_dispatch_routes_and_stops_on_exit() {
        let mut recorder = Recorder::default();
        let commands = [
            parse("scan /m"),
            parse("merge"),
            parse("convert x.mp3"),
            parse("info x.mp3"),
            parse("save"),
        ];
        for command in commands {
            assert_eq!(dispatch(&mut recorder, command).unwrap(), Flow::Continue);
        }
        assert_eq!(dispatch(&mut recorder, Command::Exit).unwrap(), Flow::Exit);

        assert_eq!(recorder.seen.len(), 6);
        assert_eq!(recorder.seen[1], "merge None");
        assert_eq!(recorder.seen[2], "convert 1");
        assert_eq!(recorder.seen[5], "exit");
    }
}
