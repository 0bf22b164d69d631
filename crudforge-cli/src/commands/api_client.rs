//! `create-api-client`: inject fetch/state code for a resource into a component

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::mutate::WriteMode;
use crudforge::scaffold::{FieldDefinition, ResourceContext, ScaffoldGenerator};
use std::path::PathBuf;

use super::print_change;

/// Inject API client code into an existing frontend file
#[derive(Debug, Clone)]
pub struct ApiClientCommand {
    file: PathBuf,
    resource: String,
    fields: Vec<String>,
    dry_run: bool,
}

impl ApiClientCommand {
    /// Create a new command instance
    ///
    /// `file` is relative to `frontend/src`.
    #[must_use]
    pub const fn new(file: PathBuf, resource: String, fields: Vec<String>, dry_run: bool) -> Self {
        Self {
            file,
            resource,
            fields,
            dry_run,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if a field definition is invalid, the target file is
    /// missing, or it has no default-exported function component.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let fields = FieldDefinition::parse_all(&self.fields)?;
        let ctx = ResourceContext::new(&self.resource, fields)?;

        let generator =
            ScaffoldGenerator::from_config(config).context("Failed to load templates")?;
        let change = generator
            .create_api_client(&self.file, &ctx, WriteMode::from_dry_run(self.dry_run))
            .with_context(|| format!("Failed to inject API client into {}", self.file.display()))?;

        println!(
            "\n{} {}",
            style("API client for").green().bold(),
            style(ctx.plural()).green().bold()
        );
        print_change(&change);
        Ok(())
    }
}
