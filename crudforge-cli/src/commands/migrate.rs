//! `apply-migrations` and `restart-backend`

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::migrations::{MigrationDriver, MigrationTarget};
use crudforge::process::SystemRunner;
use crudforge::Workspace;
use indicatif::{ProgressBar, ProgressStyle};

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}

fn driver(config: &ForgeConfig, container: Option<String>) -> MigrationDriver<SystemRunner> {
    MigrationDriver::new(
        SystemRunner,
        config.migrations.clone(),
        Workspace::from_config(config).backend_dir(),
    )
    .with_container(container)
}

/// Create an autogenerated revision and upgrade to head
#[derive(Debug, Clone)]
pub struct MigrateCommand {
    message: Option<String>,
    container: Option<String>,
}

impl MigrateCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(message: Option<String>, container: Option<String>) -> Self {
        Self { message, container }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the migration tool cannot be started or either
    /// step exits with a failure.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let driver = driver(config, self.container.clone());
        let target = match driver.target() {
            MigrationTarget::Local(dir) => dir.display().to_string(),
            MigrationTarget::Container { name, .. } => format!("container '{name}'"),
        };

        let spinner = spinner(format!("Running migrations in {target}..."))?;
        let result = driver.apply(self.message.as_deref());
        spinner.finish_and_clear();
        let report = result?;

        if !report.revision_output.trim().is_empty() {
            println!("{}", style(report.revision_output.trim_end()).dim());
        }
        if !report.upgrade_output.trim().is_empty() {
            println!("{}", style(report.upgrade_output.trim_end()).dim());
        }
        println!(
            "\n{} {}",
            style("✓ Created and applied migration:").green().bold(),
            style(&report.message).bold()
        );
        Ok(())
    }
}

/// Restart the backend container
#[derive(Debug, Clone)]
pub struct RestartCommand {
    container: Option<String>,
}

impl RestartCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(container: Option<String>) -> Self {
        Self { container }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the container runtime reports a failure.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let driver = driver(config, self.container.clone());
        let spinner = spinner("Restarting backend...".to_string())?;
        let result = driver.restart_backend();
        spinner.finish_and_clear();
        let container = result?;

        println!(
            "{} {}",
            style(format!("✓ Container '{container}' restarting.")).green().bold(),
            style("Give it 5-10 seconds to come back online.").dim()
        );
        Ok(())
    }
}
