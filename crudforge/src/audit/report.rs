//! Audit report

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::frontend::FileFindings;
use super::schema::SchemaField;

/// Result of auditing one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Singular snake name of the resource
    pub resource: String,
    /// Schema file that was analyzed, relative to the workspace root
    pub schema: PathBuf,
    /// Fields of the `*Create` schema
    pub fields: Vec<SchemaField>,
    /// Frontend files with at least one issue
    pub findings: Vec<FileFindings>,
}

impl AuditReport {
    /// Number of files with issues
    #[must_use]
    pub fn files_with_issues(&self) -> usize {
        self.findings.iter().filter(|f| f.has_issues()).count()
    }

    /// Whether no file has issues
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files_with_issues() == 0
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for findings in self.findings.iter().filter(|f| f.has_issues()) {
            writeln!(f, "In {}:", findings.path.display())?;
            for mismatch in &findings.case_mismatches {
                writeln!(
                    f,
                    "  - Potential Case Mismatch: Backend expects '{}', found '{}'",
                    mismatch.expected, mismatch.found
                )?;
            }
            if !findings.missing_required.is_empty() {
                writeln!(
                    f,
                    "  - Missing Required Fields: {}",
                    findings.missing_required.join(", ")
                )?;
            }
            writeln!(f)?;
        }

        if self.is_clean() {
            write!(f, "No obvious issues found. Frontend seems aligned.")
        } else {
            write!(f, "Found potential issues in {} files.", self.files_with_issues())
        }
    }
}
