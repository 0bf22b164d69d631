//! Model package initializer registration

use crate::error::Result;
use crate::workspace::Workspace;

use super::{edit_optional, FileChange, WriteMode};

/// Append `from .{snake} import {pascal}` unless a line already equals it
#[must_use]
pub fn add_model_import(content: &str, snake: &str, pascal: &str) -> String {
    let import = format!("from .{snake} import {pascal}");
    if content.lines().any(|line| line.trim() == import) {
        return content.to_string();
    }

    let mut updated = content.to_string();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&import);
    updated.push('\n');
    updated
}

/// Export a model from `backend/app/models/__init__.py`
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or written. A
/// missing initializer is skipped with a warning.
pub fn register_model(
    workspace: &Workspace,
    snake: &str,
    pascal: &str,
    mode: WriteMode,
) -> Result<FileChange> {
    let path = workspace.models_init();
    edit_optional(
        workspace,
        &path,
        mode,
        &format!("Exported {pascal} model"),
        |content| add_model_import(content, snake, pascal),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_import() {
        let out = add_model_import("from .user import User", "widget", "Widget");
        assert_eq!(out, "from .user import User\nfrom .widget import Widget\n");
    }

    #[test]
    fn test_duplicate_line_is_noop() {
        let content = "from .widget import Widget\n";
        assert_eq!(add_model_import(content, "widget", "Widget"), content);
    }

    #[test]
    fn test_substring_is_not_a_duplicate() {
        // a longer import that merely contains the line still gets the new one
        let content = "from .widget import WidgetPart\n";
        let out = add_model_import(content, "widget", "Widget");
        assert!(out.ends_with("from .widget import Widget\n"));
    }

    #[test]
    fn test_register_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let init = dir.path().join(ws.models_init());
        std::fs::create_dir_all(init.parent().unwrap()).unwrap();
        std::fs::write(&init, "").unwrap();

        let change = register_model(&ws, "widget", "Widget", WriteMode::Apply).unwrap();
        assert!(change.changed());
        assert_eq!(std::fs::read_to_string(&init).unwrap(), "from .widget import Widget\n");
    }
}
