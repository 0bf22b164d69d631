//! API client injection into an existing frontend component

use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

use crate::error::{ForgeError, Result};
use crate::workspace::Workspace;

use super::{commit, read_existing, FileChange, WriteMode};

static COMPONENT_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export default function \w+\(.*\) \{").expect("Invalid regex")
});

const REACT_IMPORT: &str = "import React from 'react';";
const REACT_IMPORT_WITH_HOOKS: &str = "import React, { useState, useEffect } from 'react';";

/// Insert `client_code` at the top of the default-exported function
///
/// The code goes on a new line right after the function's opening brace, and
/// a plain `import React from 'react';` is widened to import the hooks the
/// client code uses.
///
/// # Errors
///
/// Returns [`ForgeError::InjectionPointNotFound`] if the content has no
/// `export default function Name(...) {` line.
pub fn inject(content: &str, client_code: &str, path: &Path) -> Result<String> {
    let signature = COMPONENT_SIGNATURE
        .find(content)
        .ok_or_else(|| ForgeError::InjectionPointNotFound {
            path: path.to_path_buf(),
            what: "a default exported function component".to_string(),
        })?;

    let at = signature.end();
    let injected = format!("{}\n{client_code}{}", &content[..at], &content[at..]);
    Ok(injected.replace(REACT_IMPORT, REACT_IMPORT_WITH_HOOKS))
}

/// Inject rendered API client code into a file under `frontend/src`
///
/// `file` is relative to the frontend `src` directory.
///
/// # Errors
///
/// Returns an error if `file` leaves the `src` directory, the file does not
/// exist, or it has no default-exported function. Nothing is written in any
/// of these cases.
pub fn inject_api_client(
    workspace: &Workspace,
    file: &Path,
    client_code: &str,
    mode: WriteMode,
) -> Result<FileChange> {
    if !file
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(ForgeError::invalid_name(
            &file.display().to_string(),
            "file path must stay inside frontend/src",
        ));
    }
    let relative = workspace.frontend_src().join(file);
    let full = workspace.resolve(&relative);
    let current = read_existing(&full)?;
    let updated = inject(&current, client_code, &relative)?;

    commit(
        workspace,
        &relative,
        Some(&current),
        &updated,
        mode,
        "Injected API client code",
    )
}
