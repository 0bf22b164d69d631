//! Backend/frontend field alignment audit
//!
//! Compares the fields of a resource's `*Create` schema with how frontend
//! files that talk to the resource spell them.

pub mod frontend;
pub mod report;
pub mod schema;

pub use frontend::{CaseMismatch, FileFindings};
pub use report::AuditReport;
pub use schema::SchemaField;

use crate::error::{ForgeError, Result};
use crate::scaffold::NamingHelpers;
use crate::workspace::Workspace;

/// Audit one resource
///
/// # Errors
///
/// Returns an error if the name is not `snake_case`, or if the schema file is
/// missing or has no `*Create` fields.
pub fn audit_resource(workspace: &Workspace, resource_snake: &str) -> Result<AuditReport> {
    if !NamingHelpers::is_snake_case(resource_snake) {
        return Err(ForgeError::invalid_name(
            resource_snake,
            "resource names must be singular snake_case",
        ));
    }

    let schema_path = workspace.schema_file(resource_snake);
    let fields = schema::analyze(&workspace.resolve(&schema_path))?;

    let plural = NamingHelpers::pluralize(resource_snake);
    let src = workspace.resolve(workspace.frontend_src());
    tracing::debug!(dir = %src.display(), "scanning frontend");
    let findings = frontend::scan(workspace.root(), &src, resource_snake, &plural, &fields);

    let report = AuditReport {
        resource: resource_snake.to_string(),
        schema: schema_path,
        fields,
        findings,
    };
    tracing::info!(
        resource = resource_snake,
        files_with_issues = report.files_with_issues(),
        "audit finished"
    );
    Ok(report)
}
