//! Typed records of the reference backend entities
//!
//! These mirror the JSON the generated backend accepts and returns for its
//! two built-in resources, so payloads can be built and checked in Rust
//! before they are sent.

pub mod logger_category;
pub mod logger_entry;

pub use logger_category::{LoggerCategory, LoggerCategoryCreate, LoggerCategoryUpdate};
pub use logger_entry::{LoggerEntry, LoggerEntryCreate, LoggerEntryUpdate};

/// A JSON object (`Dict[str, Any]` on the backend)
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
