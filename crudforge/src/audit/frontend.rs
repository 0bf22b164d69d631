//! Frontend usage scan
//!
//! Walks the frontend sources and checks, per file that mentions the
//! resource, whether the backend's `*Create` field names are used as-is.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::schema::SchemaField;
use crate::scaffold::NamingHelpers;

/// Source extensions that are scanned
pub const EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// A snake_case field used in camelCase on the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseMismatch {
    /// Name the backend expects
    pub expected: String,
    /// camelCase spelling found instead
    pub found: String,
}

/// Problems found in one frontend file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileFindings {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Fields spelled in camelCase only
    pub case_mismatches: Vec<CaseMismatch>,
    /// Required fields never mentioned by a file that sends a request body
    pub missing_required: Vec<String>,
}

impl FileFindings {
    /// Whether the file has anything to report
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.case_mismatches.is_empty() || !self.missing_required.is_empty()
    }
}

/// Whether a file's content refers to the resource at all
#[must_use]
pub fn is_relevant(content: &str, snake: &str, plural: &str) -> bool {
    content.contains(&format!("/api/{plural}")) || content.contains(snake) || content.contains(plural)
}

/// Check one file's content against the schema fields
///
/// Assumes the file is relevant; see [`is_relevant`].
#[must_use]
pub fn inspect(path: PathBuf, content: &str, fields: &[SchemaField]) -> FileFindings {
    let case_mismatches = fields
        .iter()
        .filter(|field| field.name.contains('_'))
        .filter_map(|field| {
            let camel = NamingHelpers::to_camel_case(&field.name);
            (content.contains(&camel) && !content.contains(&field.name)).then(|| CaseMismatch {
                expected: field.name.clone(),
                found: camel,
            })
        })
        .collect();

    let sends_body = content.contains("JSON.stringify") || content.contains("body:");
    let missing_required = if sends_body {
        fields
            .iter()
            .filter(|field| field.required && !content.contains(&field.name))
            .map(|field| field.name.clone())
            .collect()
    } else {
        Vec::new()
    };

    FileFindings {
        path,
        case_mismatches,
        missing_required,
    }
}

/// Scan every source file under `src_dir`
///
/// Returns findings for relevant files that have issues, in path order.
/// Unreadable files are skipped; paths are reported relative to `root`.
#[must_use]
pub fn scan(
    root: &Path,
    src_dir: &Path,
    snake: &str,
    plural: &str,
    fields: &[SchemaField],
) -> Vec<FileFindings> {
    WalkDir::new(src_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext))
        })
        .filter_map(|entry| {
            let content = match std::fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(err) => {
                    tracing::debug!(path = %entry.path().display(), %err, "skipping unreadable file");
                    return None;
                }
            };
            if !is_relevant(&content, snake, plural) {
                return None;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();
            Some(inspect(relative, &content, fields)).filter(FileFindings::has_issues)
        })
        .collect()
}
