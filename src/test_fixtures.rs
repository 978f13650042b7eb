//! Test fixtures for orchestration tests
//!
//! A scripted [`ToolRunner`] that stands in for ffmpeg/ffprobe, and a
//! scripted [`Frontend`] that records what the user would have seen.

#![cfg(test)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::conversion::{AudioInfo, ToolOutput, ToolRunner};
use crate::error::ExitState;
use crate::ui::Frontend;

/// A successful invocation printing `stdout`
pub fn ok(stdout: &str) -> ToolOutput {
    ToolOutput {
        exit: ExitState(Some(0)),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A failed invocation with the given exit code and stderr
pub fn failed(code: i32, stderr: &str) -> ToolOutput {
    ToolOutput {
        exit: ExitState(Some(code)),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Replays scripted results in order and records every call.
///
/// Once the script runs out every call succeeds with empty output.
pub struct FakeRunner {
    script: RefCell<VecDeque<ToolOutput>>,
    calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    tool_missing: bool,
    write_outputs: bool,
    partial_outputs: bool,
    refuse_overwrite: bool,
}

impl FakeRunner {
    pub fn new(script: Vec<ToolOutput>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: RefCell::new(Vec::new()),
            tool_missing: false,
            write_outputs: false,
            partial_outputs: false,
            refuse_overwrite: false,
        }
    }

    /// A runner where the program cannot be spawned at all
    pub fn missing_tool() -> Self {
        Self {
            tool_missing: true,
            ..Self::new(Vec::new())
        }
    }

    /// Create the output file (the last argument of a call with `-i`) whenever
    /// a call succeeds, the way ffmpeg leaves its output behind
    pub fn writing_outputs(mut self) -> Self {
        self.write_outputs = true;
        self
    }

    /// Also leave the output file behind when a call fails
    pub fn leaving_partial_outputs(mut self) -> Self {
        self.partial_outputs = true;
        self
    }

    /// Fail like ffmpeg with closed stdin when the output exists and `-y` is absent
    pub fn refusing_overwrite(mut self) -> Self {
        self.refuse_overwrite = true;
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[String]) -> io::Result<ToolOutput> {
        if self.tool_missing {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }

        self.calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));

        let target = args
            .iter()
            .any(|a| a == "-i")
            .then(|| args.last())
            .flatten()
            .map(PathBuf::from);

        if self.refuse_overwrite
            && let Some(target) = &target
            && target.exists()
            && !args.iter().any(|a| a == "-y")
        {
            return Ok(failed(
                1,
                &format!(
                    "File '{}' already exists. Overwrite? [y/N] Not overwriting - exiting",
                    target.display()
                ),
            ));
        }

        let output = self.script.borrow_mut().pop_front().unwrap_or_else(|| ok(""));

        if let Some(target) = &target
            && ((self.write_outputs && output.success()) || self.partial_outputs)
        {
            File::create(target)?;
        }

        Ok(output)
    }
}

/// Front-end that answers confirmations from a script and records output
#[derive(Default)]
pub struct FakeFrontend {
    answers: VecDeque<bool>,
    pub questions: Vec<String>,
    pub logs: Vec<String>,
    pub notices: Vec<String>,
    pub errors: Vec<String>,
    pub shown_files: Vec<Vec<String>>,
    pub shown_info: Vec<AudioInfo>,
}

impl FakeFrontend {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn logged(&self, needle: &str) -> bool {
        self.logs.iter().any(|l| l.contains(needle))
    }
}

impl Frontend for FakeFrontend {
    fn log(&mut self, line: &str) {
        self.logs.push(line.to_string());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn show_files(&mut self, files: &[String]) {
        self.shown_files.push(files.to_vec());
    }

    fn show_info(&mut self, info: &AudioInfo) {
        self.shown_info.push(info.clone());
    }
}

/// Create empty files with the given names in `dir`
pub fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        File::create(dir.join(name)).expect("Failed to create fixture file");
    }
}
