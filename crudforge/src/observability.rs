//! Logging setup
//!
//! Diagnostics go to stderr so stdout stays free for command output and the
//! tool server's JSON-RPC stream. `RUST_LOG` wins over the verbosity flags.
//!
//! ```rust,no_run
//! use crudforge::observability;
//!
//! # fn main() -> crudforge::Result<()> {
//! observability::init(observability::default_directive(1, false))?;
//! tracing::info!("scaffolding started");
//! # Ok(())
//! # }
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

/// Filter directive for a `-v` count and `-q` flag
///
/// Quiet shows errors only, the default shows warnings, `-v` adds info for
/// crudforge crates, `-vv` debug and `-vvv` trace.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => "warn".to_string(),
        1 => "warn,crudforge=info,crudforge_cli=info".to_string(),
        2 => "info,crudforge=debug,crudforge_cli=debug".to_string(),
        _ => "debug,crudforge=trace,crudforge_cli=trace".to_string(),
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(directive: impl AsRef<str>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive.as_ref()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
