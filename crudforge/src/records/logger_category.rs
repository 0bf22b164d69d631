//! Logger category: a user-defined log with its own column layout

use serde::{Deserialize, Serialize};

use super::JsonObject;

/// A stored category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerCategory {
    /// Primary key
    pub id: i64,
    /// Display title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Column definitions (`{"id", "name", "type"}` objects)
    pub schema_definition: Vec<JsonObject>,
}

/// Payload for creating a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerCategoryCreate {
    /// Display title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Column definitions, empty when omitted
    #[serde(default)]
    pub schema_definition: Vec<JsonObject>,
}

/// Partial update; only provided fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerCategoryUpdate {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New column definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_definition: Option<Vec<JsonObject>>,
}

impl LoggerCategory {
    /// Materialize a create payload with its assigned id
    #[must_use]
    pub fn from_create(id: i64, create: LoggerCategoryCreate) -> Self {
        Self {
            id,
            title: create.title,
            description: create.description,
            schema_definition: create.schema_definition,
        }
    }

    /// Ids of the configured columns, in order
    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.schema_definition
            .iter()
            .filter_map(|column| column.get("id").and_then(serde_json::Value::as_str))
    }
}

impl LoggerCategoryUpdate {
    /// Overwrite the provided fields of `category`
    pub fn apply_to(self, category: &mut LoggerCategory) {
        if let Some(title) = self.title {
            category.title = title;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(schema_definition) = self.schema_definition {
            category.schema_definition = schema_definition;
        }
    }

    /// Whether the update changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.schema_definition.is_none()
    }
}
