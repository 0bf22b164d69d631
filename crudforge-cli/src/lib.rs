//! crudforge CLI library
//!
//! Command implementations behind the `crudforge` binary and the stdio tool
//! server. Both surfaces drive the same [`crudforge`] engine.

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod mcp;

pub use commands::RouteKind;
pub use mcp::ToolServer;
