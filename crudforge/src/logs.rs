//! Backend log reader
//!
//! The backend writes lines in the form
//! `2024-05-01 12:00:00,123 - backend - ERROR - something failed`.
//! Level filtering matches the ` - LEVEL - ` separator so logger names such
//! as `uvicorn.error` do not count as `ERROR` lines.

use serde::Serialize;
use std::path::Path;

use crate::error::{ForgeError, Result};

/// Which lines to return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Number of trailing lines; `0` returns every matching line
    pub lines: usize,
    /// Keep only lines at this level (case-insensitive)
    pub level: Option<String>,
}

impl LogQuery {
    /// Query for the last `lines` lines
    #[must_use]
    pub const fn last(lines: usize) -> Self {
        Self { lines, level: None }
    }

    /// Restrict to one level
    #[must_use]
    pub fn with_level(mut self, level: Option<impl Into<String>>) -> Self {
        self.level = level.map(Into::into);
        self
    }
}

/// One parsed log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogRecord<'a> {
    /// Timestamp as written by the backend
    pub timestamp: &'a str,
    /// Logger name
    pub logger: &'a str,
    /// Level name (e.g. `INFO`)
    pub level: &'a str,
    /// Message text
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Split a line into its four ` - `-separated parts
    ///
    /// Returns `None` for continuation lines such as tracebacks.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut parts = line.splitn(4, " - ");
        Some(Self {
            timestamp: parts.next()?,
            logger: parts.next()?,
            level: parts.next()?,
            message: parts.next()?,
        })
    }
}

/// Select lines from log content
#[must_use]
pub fn select<'a>(content: &'a str, query: &LogQuery) -> Vec<&'a str> {
    let needle = query
        .level
        .as_deref()
        .map(|level| format!(" - {} - ", level.trim().to_uppercase()));

    let matching: Vec<&str> = content
        .lines()
        .filter(|line| needle.as_deref().is_none_or(|n| line.contains(n)))
        .collect();

    let skip = if query.lines == 0 {
        0
    } else {
        matching.len().saturating_sub(query.lines)
    };
    matching[skip..].to_vec()
}

/// Read matching lines from a log file
///
/// # Errors
///
/// Returns [`ForgeError::FileNotFound`] if the log file does not exist yet,
/// or an I/O error if it cannot be read.
pub fn read_logs(path: &Path, query: &LogQuery) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(ForgeError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
    let lines: Vec<String> = select(&content, query)
        .into_iter()
        .map(str::to_string)
        .collect();
    tracing::debug!(path = %path.display(), matched = lines.len(), "read backend log");
    Ok(lines)
}
