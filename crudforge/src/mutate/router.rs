//! Router aggregator registration
//!
//! Wires `app.api.v1.endpoints.{plural}` into `api_router`. Imports are kept
//! sorted at the top of the file; every other non-blank line keeps its
//! original order after a single blank line.

use crate::error::Result;
use crate::workspace::Workspace;

use super::{edit_optional, FileChange, WriteMode};

/// Import line for a resource's endpoint module
#[must_use]
pub fn import_line(plural: &str) -> String {
    format!("from app.api.v1.endpoints import {plural}")
}

/// Include line for a resource's router
#[must_use]
pub fn include_line(plural: &str) -> String {
    format!("api_router.include_router({plural}.router)")
}

/// Add the import and include lines for `plural` to router source text
///
/// Returns the input unchanged when both lines are already present.
#[must_use]
pub fn add_router(content: &str, plural: &str) -> String {
    let import = import_line(plural);
    let include = include_line(plural);
    let has = |needle: &str| content.lines().any(|line| line.trim() == needle);

    let mut updated = if has(&import) {
        content.to_string()
    } else {
        let mut imports: Vec<&str> = content
            .lines()
            .filter(|line| line.starts_with("from"))
            .collect();
        imports.push(&import);
        imports.sort_unstable();

        let rest: Vec<&str> = content
            .lines()
            .filter(|line| !line.starts_with("from") && !line.trim().is_empty())
            .collect();

        format!("{}\n\n{}\n", imports.join("\n"), rest.join("\n"))
    };

    if !updated.lines().any(|line| line.trim() == include) {
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&include);
        updated.push('\n');
    }

    updated
}

/// Register a resource's router in the aggregator file
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or written. A
/// missing router file is skipped with a warning.
pub fn register_router(workspace: &Workspace, plural: &str, mode: WriteMode) -> Result<FileChange> {
    let path = workspace.routers_file();
    edit_optional(
        workspace,
        &path,
        mode,
        &format!("Registered {plural} router"),
        |content| add_router(content, plural),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTERS: &str = "\
from app.api.v1.endpoints import messages
from fastapi import APIRouter

api_router = APIRouter()
api_router.include_router(messages.router)
";

    #[test]
    fn test_adds_sorted_import_and_include() {
        let out = add_router(ROUTERS, "widgets");
        assert_eq!(
            out,
            "\
from app.api.v1.endpoints import messages
from app.api.v1.endpoints import widgets
from fastapi import APIRouter

api_router = APIRouter()
api_router.include_router(messages.router)
api_router.include_router(widgets.router)
"
        );
    }

    #[test]
    fn test_noop_when_registered() {
        let once = add_router(ROUTERS, "widgets");
        assert_eq!(add_router(&once, "widgets"), once);
    }

    #[test]
    fn test_adds_only_missing_include() {
        let content = "from app.api.v1.endpoints import widgets\n\napi_router = APIRouter()";
        let out = add_router(content, "widgets");
        assert_eq!(
            out,
            "from app.api.v1.endpoints import widgets\n\napi_router = APIRouter()\napi_router.include_router(widgets.router)\n"
        );
    }

    #[test]
    fn test_register_skips_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let change = register_router(&ws, "widgets", WriteMode::Apply).unwrap();
        assert_eq!(change.kind, super::super::ChangeKind::Skipped);
    }
}
