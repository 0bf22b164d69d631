//! crudforge: scaffolding engine for a CRUD web-application stack
//!
//! Generates and wires resources across a Python API backend (ORM models,
//! validation schemas, CRUD objects, routers) and a JavaScript frontend
//! (API proxy handlers, pages, components).
//!
//! # Overview
//!
//! - [`scaffold`]: `name:type:required` field grammar, naming helpers and the
//!   template renderer
//! - [`mutate`]: idempotent edits of the router aggregator, model package
//!   initializer, middleware route arrays and frontend components
//! - [`audit`]: backend/frontend field alignment checks
//! - [`logs`] and [`migrations`]: backend log tail and migration driver
//! - [`records`]: typed records of the reference logger entities
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crudforge::config::ForgeConfig;
//! use crudforge::mutate::WriteMode;
//! use crudforge::scaffold::{FieldDefinition, ResourceContext, ScaffoldGenerator};
//!
//! # fn main() -> crudforge::Result<()> {
//! let config = ForgeConfig::load(None)?;
//! let generator = ScaffoldGenerator::from_config(&config)?;
//!
//! let fields = FieldDefinition::parse_all(&["title:string:true", "count:integer:false"])?;
//! let ctx = ResourceContext::new("widget", fields)?;
//! let report = generator.create_resource(&ctx, WriteMode::Apply)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod audit;
pub mod config;
pub mod error;
pub mod logs;
pub mod migrations;
pub mod mutate;
pub mod observability;
pub mod process;
pub mod records;
pub mod scaffold;
pub mod workspace;

pub use error::{ForgeError, Result};
pub use workspace::Workspace;
