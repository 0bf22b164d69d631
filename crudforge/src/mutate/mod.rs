//! Textual edits on existing project files
//!
//! Every mutator is a pure `&str -> String` transform plus a thin wrapper that
//! reads the file, applies the transform and hands the result to [`commit`].
//! [`commit`] decides whether anything is written, based on [`WriteMode`].

pub mod api_client;
pub mod middleware;
pub mod models_init;
pub mod router;

use serde::Serialize;
use similar::TextDiff;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ForgeError, Result};
use crate::workspace::Workspace;

pub use api_client::inject_api_client;
pub use middleware::{add_middleware_route, RouteList};
pub use models_init::register_model;
pub use router::register_router;

/// Whether edits are written or only previewed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Write changes to disk
    #[default]
    Apply,
    /// Compute changes and return a unified diff, writing nothing
    DryRun,
}

impl WriteMode {
    /// Build from a `--dry-run` style flag
    #[must_use]
    pub const fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Apply
        }
    }
}

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// File did not exist and was (or would be) created
    Created,
    /// File existed and its content changed
    Updated,
    /// File already had the desired content
    Unchanged,
    /// File was missing and the edit was skipped
    Skipped,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        })
    }
}

/// Outcome of writing or editing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// What happened
    pub kind: ChangeKind,
    /// Human-readable summary
    pub description: String,
    /// Unified diff, only populated in dry-run mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileChange {
    /// Whether the file content differs (or would differ) from before
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self.kind, ChangeKind::Created | ChangeKind::Updated)
    }

    pub(crate) fn skipped(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Skipped,
            description: description.into(),
            diff: None,
        }
    }
}

/// Read a file the edit depends on
///
/// # Errors
///
/// Returns [`ForgeError::FileNotFound`] if the file does not exist, or an
/// I/O error if it cannot be read.
pub fn read_existing(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ForgeError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))
}

/// Unified diff between two versions of a file
#[must_use]
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let display = path.display();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{display}"), &format!("b/{display}"))
        .to_string()
}

/// Write `new` to a root-relative path unless it already holds that content
///
/// `old` is the current content, or `None` if the file does not exist yet.
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn commit(
    workspace: &Workspace,
    relative: &Path,
    old: Option<&str>,
    new: &str,
    mode: WriteMode,
    description: impl Into<String>,
) -> Result<FileChange> {
    let description = description.into();
    let kind = match old {
        Some(current) if current == new => {
            tracing::debug!(path = %relative.display(), "already up to date");
            return Ok(FileChange {
                path: relative.to_path_buf(),
                kind: ChangeKind::Unchanged,
                description,
                diff: None,
            });
        }
        Some(_) => ChangeKind::Updated,
        None => ChangeKind::Created,
    };

    let diff = match mode {
        WriteMode::DryRun => Some(unified_diff(relative, old.unwrap_or_default(), new)),
        WriteMode::Apply => {
            let full = workspace.resolve(relative);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
            }
            std::fs::write(&full, new).map_err(|e| ForgeError::io(&full, e))?;
            tracing::debug!(path = %relative.display(), %kind, "wrote file");
            None
        }
    };

    Ok(FileChange {
        path: relative.to_path_buf(),
        kind,
        description,
        diff,
    })
}

/// Read, transform and commit an existing file
///
/// A missing file is reported as [`ChangeKind::Skipped`] with a warning
/// rather than failing the whole operation.
pub(crate) fn edit_optional<F>(
    workspace: &Workspace,
    relative: &Path,
    mode: WriteMode,
    description: &str,
    transform: F,
) -> Result<FileChange>
where
    F: FnOnce(&str) -> String,
{
    let full = workspace.resolve(relative);
    if !full.is_file() {
        tracing::warn!(path = %relative.display(), "file not found, skipping");
        return Ok(FileChange::skipped(
            relative,
            format!("{description} (file not found)"),
        ));
    }

    let current = read_existing(&full)?;
    let updated = transform(&current);
    commit(workspace, relative, Some(&current), &updated, mode, description)
}
