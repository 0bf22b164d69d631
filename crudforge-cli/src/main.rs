//! crudforge CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use crudforge::config::ForgeConfig;
use crudforge::observability;
use crudforge_cli::commands::{
    ApiClientCommand, AuditCommand, ComponentCommand, LogsCommand, MiddlewareCommand,
    MigrateCommand, PageCommand, ResourceCommand, RestartCommand, RouteKind,
};
use crudforge_cli::ToolServer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crudforge")]
#[command(version)]
#[command(about = "Scaffold CRUD resources across a Python backend and a JavaScript frontend", long_about = None)]
struct Cli {
    /// Workspace root containing the backend and frontend directories
    /// (overrides `workspace.root`)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Configuration file merged over the standard locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a complete CRUD resource and register it
    CreateResource {
        /// Singular `snake_case` name (e.g., `logger_entry`)
        resource_name: String,
        /// Field definitions (e.g., `title:string:true`, `count:integer:false`)
        #[arg(required = true)]
        fields: Vec<String>,
        /// Restrict the frontend API handlers to administrators
        #[arg(long)]
        admin: bool,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a page under frontend/src/pages
    CreateFrontendPage {
        /// Page file name without extension (e.g., `logger`)
        page_name: String,
    },
    /// Create a component under frontend/src/components
    CreateFrontendComponent {
        /// `PascalCase` component name (e.g., `UserProfile`)
        component_name: String,
        /// Directory relative to frontend/src/components
        path: Option<PathBuf>,
        /// Description of what the component should do
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Inject API client code for a resource into a component
    CreateApiClient {
        /// Target file, relative to frontend/src
        file_path: PathBuf,
        /// Singular `snake_case` resource name
        resource_name: String,
        /// Field definitions used to seed the form state
        #[arg(required = true)]
        fields: Vec<String>,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Add a route to the frontend middleware's protected routes
    AddMiddlewareRoute {
        /// Route path (e.g., `/api/logger_entries`)
        route_path: String,
        /// Which route list to extend
        #[arg(long, value_enum, default_value_t = RouteKind::AuthRequired)]
        kind: RouteKind,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Check frontend usage of a resource against its backend schema
    AuditResource {
        /// Singular `snake_case` resource name
        resource_name: String,
    },
    /// Show the tail of the backend log
    ReadLogs {
        /// Number of lines (0 for all; defaults to `logs.default_lines`)
        #[arg(short = 'n', long)]
        lines: Option<usize>,
        /// Only lines at this level (e.g., ERROR)
        #[arg(long)]
        level: Option<String>,
    },
    /// Create an autogenerated migration and upgrade to head
    ApplyMigrations {
        /// Revision message
        #[arg(short, long)]
        message: Option<String>,
        /// Run inside this container instead of the configured target
        #[arg(long)]
        container: Option<String>,
    },
    /// Restart the backend container
    RestartBackend {
        /// Container to restart (defaults to the configured one, then `backend`)
        #[arg(long)]
        container: Option<String>,
    },
    /// Serve every command as a tool over stdio (JSON-RPC)
    Mcp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    observability::init(observability::default_directive(cli.verbose, cli.quiet))?;

    let mut config =
        ForgeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = cli.workspace {
        config = config.with_root(root);
    }

    match cli.command {
        Commands::CreateResource {
            resource_name,
            fields,
            admin,
            dry_run,
        } => {
            ResourceCommand::new(resource_name, fields, admin, dry_run).execute(&config)?;
        }
        Commands::CreateFrontendPage { page_name } => {
            PageCommand::new(page_name).execute(&config)?;
        }
        Commands::CreateFrontendComponent {
            component_name,
            path,
            prompt,
        } => {
            ComponentCommand::new(component_name, path.unwrap_or_default(), prompt)
                .execute(&config)?;
        }
        Commands::CreateApiClient {
            file_path,
            resource_name,
            fields,
            dry_run,
        } => {
            ApiClientCommand::new(file_path, resource_name, fields, dry_run).execute(&config)?;
        }
        Commands::AddMiddlewareRoute {
            route_path,
            kind,
            dry_run,
        } => {
            MiddlewareCommand::new(route_path, kind, dry_run).execute(&config)?;
        }
        Commands::AuditResource { resource_name } => {
            AuditCommand::new(resource_name).execute(&config)?;
        }
        Commands::ReadLogs { lines, level } => {
            LogsCommand::new(lines, level).execute(&config)?;
        }
        Commands::ApplyMigrations { message, container } => {
            MigrateCommand::new(message, container).execute(&config)?;
        }
        Commands::RestartBackend { container } => {
            RestartCommand::new(container).execute(&config)?;
        }
        Commands::Mcp => {
            ToolServer::new(config)
                .context("Failed to start tool server")?
                .serve_stdio()?;
        }
    }

    Ok(())
}
