//! External process execution
//!
//! Every ffmpeg/ffprobe call goes through [`ToolRunner`] so the orchestration
//! logic can be driven by a scripted runner in tests.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::ExitState;

/// Captured result of one external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit: ExitState,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit.0 == Some(0)
    }
}

/// Runs an external program to completion and captures its output
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// Runs tools as real child processes, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ToolOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ToolOutput {
            exit: ExitState(output.status.code()),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Render a command line for the log
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
