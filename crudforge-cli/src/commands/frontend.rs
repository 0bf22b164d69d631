//! `create-frontend-page` and `create-frontend-component`

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::mutate::WriteMode;
use crudforge::scaffold::ScaffoldGenerator;
use std::path::PathBuf;

use super::print_change;

/// Generate a page under `frontend/src/pages`
#[derive(Debug, Clone)]
pub struct PageCommand {
    name: String,
}

impl PageCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self { name }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the page name is invalid or the file cannot be
    /// written.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let generator =
            ScaffoldGenerator::from_config(config).context("Failed to load templates")?;
        let change = generator.create_page(&self.name, WriteMode::Apply)?;

        println!("\n{}", style("Created frontend page:").green().bold());
        print_change(&change);
        Ok(())
    }
}

/// Generate a component under `frontend/src/components`
#[derive(Debug, Clone)]
pub struct ComponentCommand {
    name: String,
    path: PathBuf,
    prompt: Option<String>,
}

impl ComponentCommand {
    /// Create a new command instance
    ///
    /// `path` is relative to the components directory; empty means the
    /// directory itself.
    #[must_use]
    pub const fn new(name: String, path: PathBuf, prompt: Option<String>) -> Self {
        Self { name, path, prompt }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the component name or path is invalid or the file
    /// cannot be written.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let generator =
            ScaffoldGenerator::from_config(config).context("Failed to load templates")?;
        let change = generator.create_component(
            &self.name,
            &self.path,
            self.prompt.as_deref(),
            WriteMode::Apply,
        )?;

        println!("\n{}", style("Created frontend component:").green().bold());
        print_change(&change);
        Ok(())
    }
}
