//! `create-resource`: scaffold a backend resource and its frontend proxy
//!
//! ```bash
//! crudforge create-resource logger_entry \
//!   category_id:integer:true \
//!   data:text:true \
//!   note:string:false
//! ```

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::mutate::WriteMode;
use crudforge::scaffold::{FieldDefinition, ResourceContext, ScaffoldGenerator};

use super::print_change;

/// Generate a complete CRUD resource
#[derive(Debug, Clone)]
pub struct ResourceCommand {
    name: String,
    fields: Vec<String>,
    admin: bool,
    dry_run: bool,
}

impl ResourceCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(name: String, fields: Vec<String>, admin: bool, dry_run: bool) -> Self {
        Self {
            name,
            fields,
            admin,
            dry_run,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if a field definition or the resource name is
    /// invalid, or if a file cannot be rendered or written.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        // parse everything before touching the filesystem
        let fields = FieldDefinition::parse_all(&self.fields)?;
        let ctx = ResourceContext::new(&self.name, fields)?.with_admin(self.admin);

        println!(
            "\n{} {} {}",
            style("Scaffolding resource").cyan().bold(),
            style(ctx.pascal()).green().bold(),
            style("...").cyan().bold()
        );

        let generator =
            ScaffoldGenerator::from_config(config).context("Failed to load templates")?;
        let report = generator
            .create_resource(&ctx, WriteMode::from_dry_run(self.dry_run))
            .with_context(|| format!("Failed to scaffold '{}'", ctx.snake()))?;

        println!("\n{} {} files:", style("Generated").green().bold(), report.files.len());
        for change in &report.files {
            print_change(change);
        }
        println!("\n{}", style("Registrations:").green().bold());
        for change in &report.registrations {
            print_change(change);
        }

        if self.dry_run {
            println!("\n{}", style("Dry run: nothing was written.").yellow());
            return Ok(());
        }

        println!(
            "\n{} Resource {} is ready!",
            style("✨").green().bold(),
            style(ctx.snake()).green().bold()
        );
        println!("\n{}", style("Next steps:").cyan().bold());
        println!(
            "  1. Create and apply a migration: {}",
            style(format!(
                "crudforge apply-migrations --message \"add {}\"",
                ctx.plural()
            ))
            .yellow()
        );
        println!(
            "  2. Protect the proxy routes: {}",
            style(format!("crudforge add-middleware-route /api/{}", ctx.plural())).yellow()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_field_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let config = ForgeConfig::default().with_root(dir.path());
        let cmd = ResourceCommand::new(
            "widget".to_string(),
            vec!["title:string:true".to_string(), "price:money:true".to_string()],
            false,
            false,
        );

        let err = cmd.execute(&config).unwrap_err();
        assert!(err.to_string().contains("price:money:true"));
        assert!(!dir.path().join("backend").exists());
    }

    #[test]
    fn test_writes_resource_files() {
        let dir = TempDir::new().unwrap();
        let config = ForgeConfig::default().with_root(dir.path());
        let cmd = ResourceCommand::new(
            "category".to_string(),
            vec!["title:string:true".to_string()],
            true,
            false,
        );

        cmd.execute(&config).unwrap();
        assert!(dir
            .path()
            .join("backend/app/api/v1/endpoints/categories.py")
            .is_file());
        assert!(dir
            .path()
            .join("frontend/src/pages/api/categories/[category_id].js")
            .is_file());
    }
}
