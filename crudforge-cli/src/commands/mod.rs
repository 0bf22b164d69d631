//! CLI command implementations

pub mod api_client;
pub mod audit;
pub mod frontend;
pub mod logs;
pub mod middleware;
pub mod migrate;
pub mod resource;

pub use api_client::ApiClientCommand;
pub use audit::AuditCommand;
pub use frontend::{ComponentCommand, PageCommand};
pub use logs::LogsCommand;
pub use middleware::{MiddlewareCommand, RouteKind};
pub use migrate::{MigrateCommand, RestartCommand};
pub use resource::ResourceCommand;

use console::{style, Emoji};
use crudforge::mutate::{ChangeKind, FileChange};

static CREATED: Emoji<'_, '_> = Emoji("✓ ", "+ ");
static UPDATED: Emoji<'_, '_> = Emoji("✎ ", "~ ");
static UNCHANGED: Emoji<'_, '_> = Emoji("· ", "= ");
static SKIPPED: Emoji<'_, '_> = Emoji("! ", "! ");

/// Print one file change, with its diff in dry-run mode
fn print_change(change: &FileChange) {
    let marker = match change.kind {
        ChangeKind::Created => style(CREATED).green(),
        ChangeKind::Updated => style(UPDATED).cyan(),
        ChangeKind::Unchanged => style(UNCHANGED).dim(),
        ChangeKind::Skipped => style(SKIPPED).yellow(),
    };
    println!(
        "  {}{} {}",
        marker,
        style(change.path.display()).dim(),
        style(format!("({}, {})", change.description, change.kind)).dim()
    );
    if let Some(diff) = &change.diff {
        for line in diff.lines() {
            let styled = match line.chars().next() {
                Some('+') if !line.starts_with("+++") => style(line).green(),
                Some('-') if !line.starts_with("---") => style(line).red(),
                Some('@') => style(line).cyan(),
                _ => style(line).dim(),
            };
            println!("    {styled}");
        }
    }
}
