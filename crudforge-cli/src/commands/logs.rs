//! `read-logs`: tail the backend log

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::logs::{read_logs, LogQuery, LogRecord};

/// Print the last lines of the backend log
#[derive(Debug, Clone)]
pub struct LogsCommand {
    lines: Option<usize>,
    level: Option<String>,
}

impl LogsCommand {
    /// Create a new command instance
    ///
    /// `lines` falls back to the configured default.
    #[must_use]
    pub const fn new(lines: Option<usize>, level: Option<String>) -> Self {
        Self { lines, level }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the log file does not exist or cannot be read.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let path = config.workspace.root.join(&config.logs.file);
        let query = LogQuery::last(self.lines.unwrap_or(config.logs.default_lines))
            .with_level(self.level.clone());
        let lines = read_logs(&path, &query)
            .with_context(|| format!("Failed to read logs from {}", path.display()))?;

        if lines.is_empty() {
            println!("{}", style("No matching log lines.").dim());
            return Ok(());
        }

        for line in &lines {
            let styled = match LogRecord::parse(line).map(|record| record.level) {
                Some("ERROR" | "CRITICAL") => style(line.as_str()).red(),
                Some("WARNING") => style(line.as_str()).yellow(),
                Some("DEBUG") => style(line.as_str()).dim(),
                _ => style(line.as_str()),
            };
            println!("{styled}");
        }
        Ok(())
    }
}
