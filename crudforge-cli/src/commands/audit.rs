//! `audit-resource`: compare backend schema fields with frontend usage

use anyhow::{Context, Result};
use console::style;
use crudforge::audit::audit_resource;
use crudforge::config::ForgeConfig;
use crudforge::Workspace;

/// Audit one resource
#[derive(Debug, Clone)]
pub struct AuditCommand {
    resource: String,
}

impl AuditCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(resource: String) -> Self {
        Self { resource }
    }

    /// Execute the command
    ///
    /// Findings are reported, not treated as failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema file is missing or has no `Create`
    /// class fields.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let workspace = Workspace::from_config(config);
        let report = audit_resource(&workspace, &self.resource)
            .with_context(|| format!("Failed to audit '{}'", self.resource))?;

        println!(
            "\n{} {} {}",
            style("Auditing").cyan().bold(),
            style(&self.resource).green().bold(),
            style(format!("against {}", report.schema.display())).dim()
        );
        let required: Vec<&str> = report.required_fields().collect();
        println!(
            "  {} {}",
            style("Required fields:").dim(),
            if required.is_empty() {
                "(none)".to_string()
            } else {
                required.join(", ")
            }
        );
        println!();

        let summary = report.to_string();
        if report.is_clean() {
            println!("{}", style(summary).green());
        } else {
            println!("{}", style(summary).yellow());
        }
        Ok(())
    }
}
