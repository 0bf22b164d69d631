//! `add-middleware-route`: protect a frontend route

use anyhow::{Context, Result};
use console::style;
use crudforge::config::ForgeConfig;
use crudforge::mutate::{add_middleware_route, RouteList, WriteMode};
use crudforge::Workspace;

use super::print_change;

/// Which protected-route array receives the route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RouteKind {
    /// Any signed-in user (`AUTH_REQUIRED_ROUTES`)
    #[default]
    AuthRequired,
    /// Administrators only (`ADMIN_ROUTES`)
    Admin,
}

impl From<RouteKind> for RouteList {
    fn from(kind: RouteKind) -> Self {
        match kind {
            RouteKind::AuthRequired => Self::AuthRequired,
            RouteKind::Admin => Self::Admin,
        }
    }
}

/// Add a route to the frontend middleware
#[derive(Debug, Clone)]
pub struct MiddlewareCommand {
    route: String,
    kind: RouteKind,
    dry_run: bool,
}

impl MiddlewareCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(route: String, kind: RouteKind, dry_run: bool) -> Self {
        Self {
            route,
            kind,
            dry_run,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the middleware file, its marker comment, or the
    /// target array is missing.
    pub fn execute(&self, config: &ForgeConfig) -> Result<()> {
        let workspace = Workspace::from_config(config);
        let list = RouteList::from(self.kind);
        let change = add_middleware_route(
            &workspace,
            &self.route,
            list,
            WriteMode::from_dry_run(self.dry_run),
        )
        .with_context(|| format!("Failed to add '{}' to {list}", self.route))?;

        let headline = if change.changed() {
            style(format!("Added route '{}' to {list}", self.route)).green().bold()
        } else {
            style(format!("Route '{}' is already in {list}", self.route)).dim()
        };
        println!("\n{headline}");
        print_change(&change);
        Ok(())
    }
}
