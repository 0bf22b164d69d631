//! Protected-route lists in the frontend middleware
//!
//! The middleware declares its route arrays below marker comments:
//!
//! ```js
//! // --- MCP will insert AUTH_REQUIRED_ROUTES here ---
//! const AUTH_REQUIRED_ROUTES = [
//!   "/dashboard",
//! ];
//! ```
//!
//! Routes are added inside the array that follows the marker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ForgeError, Result};
use crate::workspace::Workspace;

use super::{commit, read_existing, FileChange, WriteMode};

/// Which protected-route array to edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteList {
    /// Routes that need any signed-in user
    #[default]
    AuthRequired,
    /// Routes that need an administrator
    Admin,
}

impl RouteList {
    /// JavaScript constant holding the routes
    #[must_use]
    pub const fn array_name(self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED_ROUTES",
            Self::Admin => "ADMIN_ROUTES",
        }
    }

    /// Marker comment placed above the array
    #[must_use]
    pub fn marker(self) -> String {
        format!("// --- MCP will insert {} here ---", self.array_name())
    }
}

impl FromStr for RouteList {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auth_required" | "auth-required" => Ok(Self::AuthRequired),
            "admin" => Ok(Self::Admin),
            other => Err(ForgeError::invalid_name(
                other,
                "route kind must be 'auth_required' or 'admin'",
            )),
        }
    }
}

impl fmt::Display for RouteList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.array_name())
    }
}

/// Insert `route` into the array for `list`
///
/// A route already present in the array leaves the content unchanged.
///
/// # Errors
///
/// Returns [`ForgeError::InjectionPointNotFound`] if the marker comment, the
/// array declaration after it, or the array's closing bracket is missing.
pub fn insert_route(content: &str, route: &str, list: RouteList, path: &Path) -> Result<String> {
    let array = list.array_name();
    let missing = |what: String| ForgeError::InjectionPointNotFound {
        path: path.to_path_buf(),
        what,
    };

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let marker = list.marker();
    let marker_idx = lines
        .iter()
        .position(|line| line.contains(&marker))
        .ok_or_else(|| missing(format!("marker comment '{marker}'")))?;

    let declaration = format!("const {array} = [");
    let array_idx = lines
        .iter()
        .enumerate()
        .skip(marker_idx + 1)
        .find(|(_, line)| line.contains(&declaration))
        .map(|(idx, _)| idx)
        .ok_or_else(|| missing(format!("'{declaration}' after the marker comment")))?;

    let entry = format!("  \"{route}\",");
    let quoted = [format!("\"{route}\""), format!("'{route}'")];
    let listed = |line: &str| quoted.iter().any(|q| line.contains(q.as_str()));

    let array_line = lines[array_idx].clone();
    let open = array_line.find(&declaration).map_or(0, |i| i + declaration.len() - 1);

    if array_line.trim_end().trim_end_matches(';').ends_with("[]") {
        lines[array_idx] = array_line.replacen("[]", &format!("[\n{entry}\n]"), 1);
    } else if let Some(close) = array_line.rfind(']').filter(|&close| close > open) {
        // single-line array: `const X = ["/a", "/b"];`
        if listed(&array_line[open..close]) {
            return Ok(content.to_string());
        }
        let inner = array_line[open + 1..close].trim().trim_end_matches(',');
        let (head, tail) = (&array_line[..open], &array_line[close + 1..]);
        lines[array_idx] = if inner.trim().is_empty() {
            // `[ ]` and other blank literals
            format!("{head}[\n{entry}\n]{tail}")
        } else {
            format!("{head}[{inner}, \"{route}\"]{tail}")
        };
    } else {
        let close_idx = lines
            .iter()
            .enumerate()
            .skip(array_idx + 1)
            .find(|(_, line)| line.trim_start().starts_with(']'))
            .map(|(idx, _)| idx)
            .ok_or_else(|| missing(format!("closing bracket of {array}")))?;

        if lines[array_idx + 1..close_idx].iter().any(|line| listed(line.as_str())) {
            return Ok(content.to_string());
        }
        lines.insert(close_idx, entry);
    }

    let mut updated = lines.join("\n");
    if content.ends_with('\n') {
        updated.push('\n');
    }
    Ok(updated)
}

/// Add a route to one of the middleware's protected-route arrays
///
/// # Errors
///
/// Returns an error if the middleware file is missing, or if the marker or
/// array cannot be found. Nothing is written in either case.
pub fn add_middleware_route(
    workspace: &Workspace,
    route: &str,
    list: RouteList,
    mode: WriteMode,
) -> Result<FileChange> {
    let relative = workspace.middleware_file();
    let full = workspace.resolve(&relative);
    let current = read_existing(&full)?;
    let updated = insert_route(&current, route, list, &relative)?;

    commit(
        workspace,
        &relative,
        Some(&current),
        &updated,
        mode,
        format!("Added route '{route}' to {list}"),
    )
}
