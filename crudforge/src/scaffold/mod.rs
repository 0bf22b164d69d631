//! CRUD scaffold generator
//!
//! Turns a resource name and `name:type:required` field definitions into a
//! backend model, schema, CRUD object and router plus frontend API proxy
//! handlers, and renders single-file pages, components and API clients.

pub mod context;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use context::ResourceContext;
pub use field_type::{FieldDefinition, FieldType};
pub use generator::{GeneratedFile, ResourceReport, ScaffoldGenerator};
pub use helpers::NamingHelpers;
pub use templates::TemplateRegistry;
