//! Backend schema analysis
//!
//! Finds the annotated fields of every top-level class whose name ends in
//! `Create`. This is a line scanner for the schemas the generator emits and
//! hand-written ones in the same shape, not a Python parser: nested blocks,
//! comments and docstrings are skipped, and only `name: annotation` lines at
//! the class-body indentation count.

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{ForgeError, Result};

static CLASS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+)\s*[(:]").expect("Invalid regex"));

static ANNOTATED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s*:\s*(.+)$").expect("Invalid regex"));

/// A field of a `*Create` schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Field name
    pub name: String,
    /// Annotation text as written (e.g. `Optional[str]`)
    pub annotation: String,
    /// Neither defaulted nor `Optional[...]`
    pub required: bool,
}

/// Collect the fields of every `*Create` class in `source`
#[must_use]
pub fn create_fields(source: &str) -> Vec<SchemaField> {
    let mut fields = Vec::new();
    let mut docstring: Option<&str> = None;
    let mut in_create = false;
    let mut in_header = false;
    let mut body_indent: Option<usize> = None;

    for raw in source.lines() {
        let line = strip_comment(raw).trim_end();
        let trimmed = line.trim_start();

        if let Some(quote) = docstring {
            if trimmed.contains(quote) {
                docstring = None;
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if let Some(quote) = ["\"\"\"", "'''"].into_iter().find(|q| trimmed.starts_with(q)) {
            if trimmed.matches(quote).count() == 1 {
                docstring = Some(quote);
            }
            continue;
        }

        if in_header {
            in_header = !line.ends_with(':');
            continue;
        }

        let indent = line.len() - trimmed.len();
        if indent == 0 {
            let header = CLASS_HEADER.captures(line);
            in_create = header
                .as_ref()
                .is_some_and(|caps| caps[1].ends_with("Create"));
            // bases split over several lines: `class XCreate(\n    Base\n):`
            in_header = header.is_some() && !line.ends_with(':');
            body_indent = None;
            continue;
        }
        if !in_create {
            continue;
        }

        let expected = *body_indent.get_or_insert(indent);
        if indent != expected {
            continue;
        }

        if let Some(caps) = ANNOTATED_FIELD.captures(trimmed) {
            let (annotation, default) = split_default(&caps[2]);
            let annotation = annotation.trim().to_string();
            let has_default = default.is_some();
            fields.push(SchemaField {
                name: caps[1].to_string(),
                required: !has_default && !annotation.starts_with("Optional["),
                annotation,
            });
        }
    }

    fields
}

/// Analyze a schema file
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or has no
/// fields in any class ending in `Create`.
pub fn analyze(path: &Path) -> Result<Vec<SchemaField>> {
    if !path.is_file() {
        return Err(ForgeError::FileNotFound(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;

    let fields = create_fields(&source);
    if fields.is_empty() {
        return Err(ForgeError::Schema {
            path: path.to_path_buf(),
            reason: "no fields found; ensure a class ending in 'Create' exists".to_string(),
        });
    }
    tracing::debug!(path = %path.display(), fields = fields.len(), "schema analyzed");
    Ok(fields)
}

/// Split `annotation = default` at the first `=` outside brackets and strings
fn split_default(rest: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        match (quote, c) {
            _ if escaped => escaped = false,
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(' | '{') => depth += 1,
            (None, ']' | ')' | '}') => depth = depth.saturating_sub(1),
            (None, '=') if depth == 0 => return (&rest[..idx], Some(rest[idx + 1..].trim())),
            _ => {}
        }
    }
    (rest, None)
}

/// Drop a trailing `#` comment that is not inside a string literal
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match (quote, c) {
            _ if escaped => escaped = false,
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '#') => return &line[..idx],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGGER_CATEGORY: &str = r#"from pydantic import BaseModel
from typing import Optional, List, Dict, Any

# Pydantic model for creating a new LoggerCategory
class LoggerCategoryCreate(BaseModel):
    title: str
    description: Optional[str] = None
    schema_definition: List[Dict[str, Any]] = []

# All fields are optional for partial updates
class LoggerCategoryUpdate(BaseModel):
    title: Optional[str] = None

class LoggerCategory(BaseModel):
    id: int
    title: str

    class Config:
        from_attributes = True
"#;

    fn names(fields: &[SchemaField]) -> Vec<(&str, bool)> {
        fields.iter().map(|f| (f.name.as_str(), f.required)).collect()
    }

    #[test]
    fn test_only_create_classes() {
        let fields = create_fields(LOGGER_CATEGORY);
        assert_eq!(
            names(&fields),
            vec![("title", true), ("description", false), ("schema_definition", false)]
        );
        assert_eq!(fields[2].annotation, "List[Dict[str, Any]]");
    }

    #[test]
    fn test_optional_without_default() {
        let src = "class EntryCreate(BaseModel):\n    note: Optional[str]\n    category_id: int\n";
        assert_eq!(names(&create_fields(src)), vec![("note", false), ("category_id", true)]);
    }

    #[test]
    fn test_skips_docstrings_comments_and_nested_blocks() {
        let src = r#"
class EntryCreate(BaseModel):
    """Payload for new entries.

    data: this line is documentation
    """
    category_id: int  # foreign key
    # hidden: str
    data: Dict[str, Any]

    @validator("data")
    def check(cls, v):
        inner: int = 1
        return v

    logged_at: datetime = Field(default_factory=datetime.utcnow)
"#;
        assert_eq!(
            names(&create_fields(src)),
            vec![("category_id", true), ("data", true), ("logged_at", false)]
        );
    }

    #[test]
    fn test_class_ends_at_top_level_statement() {
        let src = "class ACreate(BaseModel):\n    a: int\nx = 1\n    b: int\n";
        assert_eq!(names(&create_fields(src)), vec![("a", true)]);
    }

    #[test]
    fn test_keyword_arguments_inside_annotation() {
        let src = "class WidgetCreate(BaseModel):\n    count: Annotated[int, Field(gt=0)]\n    kind: Literal[\"a=b\"]\n    size: Annotated[int, Field(le=9)] = 3\n    title: str\n";
        let fields = create_fields(src);
        assert_eq!(
            names(&fields),
            vec![("count", true), ("kind", true), ("size", false), ("title", true)]
        );
        assert_eq!(fields[0].annotation, "Annotated[int, Field(gt=0)]");
        assert_eq!(fields[1].annotation, "Literal[\"a=b\"]");
        assert_eq!(fields[2].annotation, "Annotated[int, Field(le=9)]");
    }

    #[test]
    fn test_split_default() {
        assert_eq!(split_default("int = 5"), ("int ", Some("5")));
        assert_eq!(split_default("Dict[str, int] = {}"), ("Dict[str, int] ", Some("{}")));
        assert_eq!(split_default("Literal['=']"), ("Literal['=']", None));
    }

    #[test]
    fn test_multi_line_class_header() {
        let src = "class WidgetCreate(\n    BaseModel\n):\n    title: str\n    note: Optional[str] = None\n\nclass WidgetUpdate(\n    BaseModel,\n):\n    title: str\n";
        assert_eq!(names(&create_fields(src)), vec![("title", true), ("note", false)]);
    }

    #[test]
    fn test_hash_inside_string_is_not_comment() {
        assert_eq!(strip_comment(r##"color: str = "#fff"  # default"##), r##"color: str = "#fff"  "##);
    }

    #[test]
    fn test_analyze_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.py");
        assert!(matches!(analyze(&missing), Err(ForgeError::FileNotFound(_))));

        let empty = dir.path().join("empty.py");
        std::fs::write(&empty, "class ThingUpdate(BaseModel):\n    a: int\n").unwrap();
        let err = analyze(&empty).unwrap_err();
        assert!(err.to_string().contains("ensure a class ending in 'Create' exists"));
    }
}
