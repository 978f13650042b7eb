//! Terminal front-end
//!
//! Log lines are printed as `[HH:MM:SS] message`. Questions are answered on
//! the input stream unless a fixed policy was chosen on the command line.

use std::io::{self, BufRead, Write};

use super::Frontend;
use crate::conversion::AudioInfo;

/// How yes/no questions are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    /// Ask on the input stream
    #[default]
    Ask,
    /// Answer every question with yes
    AlwaysYes,
    /// Answer every question with no
    AlwaysNo,
}

/// Front-end writing to a terminal (or any writer) and reading answers from a reader
pub struct ConsoleFrontend<R, W> {
    input: R,
    output: W,
    policy: ConfirmPolicy,
}

impl ConsoleFrontend<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(policy: ConfirmPolicy) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), policy)
    }
}

impl<R: BufRead, W: Write> ConsoleFrontend<R, W> {
    pub fn new(input: R, output: W, policy: ConfirmPolicy) -> Self {
        Self {
            input,
            output,
            policy,
        }
    }

    /// Print a prompt and read one line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // A broken terminal is not worth aborting a merge over
    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            log::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Frontend for ConsoleFrontend<R, W> {
    fn log(&mut self, line: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.emit(&format!("[{}] {}", timestamp, line));
    }

    fn notify(&mut self, message: &str) {
        self.emit(message);
    }

    fn error(&mut self, message: &str) {
        self.emit(&format!("Error: {}", message));
    }

    fn confirm(&mut self, question: &str) -> bool {
        match self.policy {
            ConfirmPolicy::AlwaysYes => {
                self.emit(&format!("{} [y/N] y", question));
                true
            }
            ConfirmPolicy::AlwaysNo => {
                self.emit(&format!("{} [y/N] n", question));
                false
            }
            ConfirmPolicy::Ask => match self.read_line(&format!("{} [y/N] ", question)) {
                Ok(Some(answer)) => {
                    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
                }
                Ok(None) => false,
                Err(e) => {
                    log::warn!("Failed to read answer: {}", e);
                    false
                }
            },
        }
    }

    fn show_files(&mut self, files: &[String]) {
        if files.is_empty() {
            self.emit("(no audio files)");
            return;
        }
        for (i, file) in files.iter().enumerate() {
            self.emit(&format!("{:>4}. {}", i + 1, file));
        }
    }

    fn show_info(&mut self, info: &AudioInfo) {
        for (label, value) in info.lines() {
            self.emit(&format!("{:<15} {}", format!("{}:", label), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str, policy: ConfirmPolicy) -> ConsoleFrontend<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleFrontend::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), policy)
    }

    fn printed(frontend: ConsoleFrontend<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(frontend.into_output()).unwrap()
    }

    #[test]
    fn test_confirm_reads_answer() {
        let mut frontend = console("yes\nn\n", ConfirmPolicy::Ask);
        assert!(frontend.confirm("Delete?"));
        assert!(!frontend.confirm("Delete?"));
        // End of input counts as no
        assert!(!frontend.confirm("Delete?"));
    }

    #[test]
    fn test_confirm_policies() {
        let mut yes = console("", ConfirmPolicy::AlwaysYes);
        assert!(yes.confirm("Retry?"));
        let mut no = console("y\n", ConfirmPolicy::AlwaysNo);
        assert!(!no.confirm("Retry?"));
    }

    #[test]
    fn test_log_lines_are_timestamped() {
        let mut frontend = console("", ConfirmPolicy::Ask);
        frontend.log("Found 3 audio files");
        let text = printed(frontend);
        assert!(text.starts_with('['));
        assert_eq!(&text[9..11], "] ");
        assert!(text.trim_end().ends_with("Found 3 audio files"));
    }

    #[test]
    fn test_show_files_numbers_entries() {
        let mut frontend = console("", ConfirmPolicy::Ask);
        frontend.show_files(&["a1.mp3".to_string(), "a2.mp3".to_string()]);
        assert_eq!(printed(frontend), "   1. a1.mp3\n   2. a2.mp3\n");
    }

    #[test]
    fn test_read_line_strips_newline() {
        let mut frontend = console("scan /music\r\n", ConfirmPolicy::Ask);
        assert_eq!(frontend.read_line("> ").unwrap().as_deref(), Some("scan /music"));
        assert_eq!(frontend.read_line("> ").unwrap(), None);
    }
}
