//! Child process execution
//!
//! External tools (the migration tool, the container runtime) are invoked
//! through [`ProcessRunner`] so callers can be exercised without spawning
//! anything.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{ForgeError, Result};

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments, passed without shell interpretation
    pub args: Vec<String>,
    /// Working directory; inherits the current one when `None`
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Diagnostic text of a failed run: stderr, or stdout when stderr is empty
    #[must_use]
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs commands to completion, capturing their output
pub trait ProcessRunner {
    /// Run a command and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started. A non-zero exit is
    /// not an error at this level; check [`ProcessOutput::success`].
    fn run(&self, command: &CommandSpec) -> Result<ProcessOutput>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, command: &CommandSpec) -> Result<ProcessOutput> {
        (**self).run(command)
    }
}

/// Runs commands with [`std::process::Command`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<ProcessOutput> {
        tracing::debug!(%command, cwd = ?command.cwd, "spawning");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| ForgeError::Process {
            step: format!("starting {}", command.program),
            output: e.to_string(),
        })?;

        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
