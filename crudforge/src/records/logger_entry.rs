//! Logger entry: one row of a category's log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::logger_category::LoggerCategory;
use super::JsonObject;

/// A stored entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerEntry {
    /// Primary key
    pub id: i64,
    /// Owning category
    pub category_id: i64,
    /// Values keyed by column id
    pub data: JsonObject,
    /// When the entry was logged
    pub logged_at: DateTime<Utc>,
}

/// Payload for creating an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerEntryCreate {
    /// Owning category
    pub category_id: i64,
    /// Values keyed by column id
    pub data: JsonObject,
    /// When the entry was logged
    pub logged_at: DateTime<Utc>,
}

/// Partial update; only provided fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerEntryUpdate {
    /// New category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Replacement values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
    /// New timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_at: Option<DateTime<Utc>>,
}

impl LoggerEntry {
    /// Materialize a create payload with its assigned id
    #[must_use]
    pub fn from_create(id: i64, create: LoggerEntryCreate) -> Self {
        Self {
            id,
            category_id: create.category_id,
            data: create.data,
            logged_at: create.logged_at,
        }
    }

    /// Column ids of `category` that have no value in this entry
    #[must_use]
    pub fn missing_columns<'a>(&self, category: &'a LoggerCategory) -> Vec<&'a str> {
        category
            .column_ids()
            .filter(|id| !self.data.contains_key(*id))
            .collect()
    }
}

impl LoggerEntryUpdate {
    /// Overwrite the provided fields of `entry`
    pub fn apply_to(self, entry: &mut LoggerEntry) {
        if let Some(category_id) = self.category_id {
            entry.category_id = category_id;
        }
        if let Some(data) = self.data {
            entry.data = data;
        }
        if let Some(logged_at) = self.logged_at {
            entry.logged_at = logged_at;
        }
    }
}
