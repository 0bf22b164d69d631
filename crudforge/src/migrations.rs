//! Migration driver
//!
//! Creates an autogenerated revision and upgrades to head, either in the
//! local backend directory or inside the backend container:
//!
//! ```text
//! alembic revision --autogenerate -m "<message>"
//! alembic upgrade head
//! ```
//!
//! Each command runs once. The first failure stops the sequence and its
//! output is returned verbatim.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::MigrationSettings;
use crate::error::{ForgeError, Result};
use crate::process::{CommandSpec, ProcessRunner};

/// Revision message used when none is given
pub const DEFAULT_MESSAGE: &str = "New migration";

/// Container restarted when none is configured
pub const DEFAULT_CONTAINER: &str = "backend";

/// Where the migration tool runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationTarget {
    /// Run locally with this directory as working directory
    Local(PathBuf),
    /// Run through `<runtime> exec -w <workdir> <container>`
    Container {
        /// Container name
        name: String,
        /// Working directory inside the container
        workdir: String,
    },
}

/// Outcome of a successful migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Revision message that was used
    pub message: String,
    /// Output of the revision step
    pub revision_output: String,
    /// Output of the upgrade step
    pub upgrade_output: String,
}

/// Drives the migration tool and container runtime
#[derive(Debug)]
pub struct MigrationDriver<R> {
    runner: R,
    settings: MigrationSettings,
    backend_dir: PathBuf,
}

impl<R: ProcessRunner> MigrationDriver<R> {
    /// Create a driver
    ///
    /// `backend_dir` is the working directory for local runs.
    pub fn new(runner: R, settings: MigrationSettings, backend_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            settings,
            backend_dir: backend_dir.into(),
        }
    }

    /// Run inside `container` instead of the configured target
    #[must_use]
    pub fn with_container(mut self, container: Option<String>) -> Self {
        if container.is_some() {
            self.settings.container = container;
        }
        self
    }

    /// Where commands will run
    #[must_use]
    pub fn target(&self) -> MigrationTarget {
        self.settings.container.as_ref().map_or_else(
            || MigrationTarget::Local(self.backend_dir.clone()),
            |name| MigrationTarget::Container {
                name: name.clone(),
                workdir: self.settings.container_workdir.clone(),
            },
        )
    }

    /// The revision and upgrade commands, in execution order
    #[must_use]
    pub fn commands(&self, message: &str) -> [CommandSpec; 2] {
        [
            self.tool_command(["revision", "--autogenerate", "-m", message]),
            self.tool_command(["upgrade", "head"]),
        ]
    }

    /// Create a revision and upgrade to head
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Process`] naming the failed step with the tool's
    /// output, or if a command cannot be started.
    pub fn apply(&self, message: Option<&str>) -> Result<MigrationReport> {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MESSAGE);
        let [revision, upgrade] = self.commands(message);

        let revision_output = self.run_step("creating revision", &revision)?;
        let upgrade_output = self.run_step("applying migrations", &upgrade)?;

        tracing::info!(revision = message, target = ?self.target(), "migrations applied");
        Ok(MigrationReport {
            message: message.to_string(),
            revision_output,
            upgrade_output,
        })
    }

    /// Restart the backend container
    ///
    /// Uses the configured container, or `backend` when none is set.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Process`] if the runtime reports a failure.
    pub fn restart_backend(&self) -> Result<String> {
        let container = self
            .settings
            .container
            .as_deref()
            .unwrap_or(DEFAULT_CONTAINER);
        let command =
            CommandSpec::new(&self.settings.container_runtime).args(["restart", container]);
        self.run_step("restarting backend", &command)?;
        tracing::info!(container, "backend restarting");
        Ok(container.to_string())
    }

    fn tool_command<const N: usize>(&self, args: [&str; N]) -> CommandSpec {
        match self.target() {
            MigrationTarget::Local(dir) => CommandSpec::new(&self.settings.tool)
                .args(args)
                .current_dir(dir),
            MigrationTarget::Container { name, workdir } => {
                CommandSpec::new(&self.settings.container_runtime)
                    .args(["exec", "-w", workdir.as_str(), name.as_str(), self.settings.tool.as_str()])
                    .args(args)
            }
        }
    }

    fn run_step(&self, step: &str, command: &CommandSpec) -> Result<String> {
        tracing::debug!(step, %command, "running");
        let output = self.runner.run(command)?;
        if !output.success {
            tracing::warn!(step, %command, "command failed");
            return Err(ForgeError::Process {
                step: step.to_string(),
                output: output.diagnostics().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every command and replays canned outputs
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<CommandSpec>>,
        outputs: RefCell<VecDeque<ProcessOutput>>,
    }

    impl FakeRunner {
        fn replying(outputs: impl IntoIterator<Item = ProcessOutput>) -> Self {
            Self {
                calls: RefCell::default(),
                outputs: RefCell::new(outputs.into_iter().collect()),
            }
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, command: &CommandSpec) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(command.clone());
            Ok(self.outputs.borrow_mut().pop_front().unwrap_or(ProcessOutput {
                success: true,
                ..ProcessOutput::default()
            }))
        }
    }

    fn ok(stdout: &str) -> ProcessOutput {
        ProcessOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn failed(stderr: &str) -> ProcessOutput {
        ProcessOutput {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_local_runs_revision_then_upgrade() {
        let fake = FakeRunner::replying([ok("Generating rev"), ok("Running upgrade")]);
        let driver = MigrationDriver::new(&fake, MigrationSettings::default(), "/ws/backend");

        let report = driver.apply(None).unwrap();
        assert_eq!(report.message, DEFAULT_MESSAGE);
        assert_eq!(report.upgrade_output, "Running upgrade");

        let calls = fake.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].to_string(),
            "alembic revision --autogenerate -m \"New migration\""
        );
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/ws/backend")));
        assert_eq!(calls[1].to_string(), "alembic upgrade head");
    }

    #[test]
    fn test_stops_at_first_failure() {
        let fake = FakeRunner::replying([failed("FAILED: Can't locate revision\n")]);
        let driver = MigrationDriver::new(&fake, MigrationSettings::default(), "/ws/backend");

        let err = driver.apply(Some("add widgets")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error creating revision: FAILED: Can't locate revision\n"
        );
        assert_eq!(fake.calls.borrow().len(), 1);
    }

    #[test]
    fn test_upgrade_failure_is_named() {
        let fake = FakeRunner::replying([ok(""), failed("Target database is not up to date.")]);
        let driver = MigrationDriver::new(&fake, MigrationSettings::default(), "/ws/backend");
        let err = driver.apply(Some("x")).unwrap_err();
        assert!(err.to_string().starts_with("Error applying migrations:"));
        assert_eq!(fake.calls.borrow().len(), 2);
    }

    #[test]
    fn test_container_commands() {
        let fake = FakeRunner::default();
        let driver = MigrationDriver::new(&fake, MigrationSettings::default(), "/ws/backend")
            .with_container(Some("api".to_string()));

        let [revision, upgrade] = driver.commands("m");
        assert_eq!(
            revision.to_string(),
            "docker exec -w /code api alembic revision --autogenerate -m m"
        );
        assert_eq!(upgrade.to_string(), "docker exec -w /code api alembic upgrade head");
        assert!(revision.cwd.is_none());
    }

    #[test]
    fn test_restart_backend_defaults_container() {
        let fake = FakeRunner::default();
        let driver = MigrationDriver::new(&fake, MigrationSettings::default(), "/ws/backend");
        assert_eq!(driver.restart_backend().unwrap(), "backend");
        assert_eq!(fake.calls.borrow()[0].to_string(), "docker restart backend");
    }
}
