//! Template context for a scaffolded resource

use serde::Serialize;

use super::field_type::FieldDefinition;
use super::helpers::NamingHelpers;
use crate::error::{ForgeError, Result};

/// Naming variants and fields of one resource
///
/// Serialized as-is into every resource template, so field names here are
/// the variable names templates use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContext {
    /// Singular `snake_case` name (e.g., `logger_entry`)
    pub resource_name_snake: String,
    /// Singular `PascalCase` name (e.g., `LoggerEntry`)
    pub resource_name_pascal: String,
    /// Plural `snake_case` name (e.g., `logger_entries`)
    pub resource_name_plural_snake: String,
    /// Plural `PascalCase` name (e.g., `LoggerEntries`)
    pub resource_name_plural_pascal: String,
    /// Parsed fields, in declaration order
    pub fields: Vec<FieldDefinition>,
    /// Whether frontend handlers require an admin rather than any signed-in user
    pub is_admin_resource: bool,
}

impl ResourceContext {
    /// Build the context for a resource
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not lowercase `snake_case`.
    pub fn new(name: &str, fields: Vec<FieldDefinition>) -> Result<Self> {
        let name = name.trim();
        if !NamingHelpers::is_snake_case(name) {
            return Err(ForgeError::invalid_name(
                name,
                "resource names must be singular snake_case (e.g., 'product_item')",
            ));
        }

        let plural = NamingHelpers::pluralize(name);
        Ok(Self {
            resource_name_snake: name.to_string(),
            resource_name_pascal: NamingHelpers::to_pascal_case(name),
            resource_name_plural_pascal: NamingHelpers::to_pascal_case(&plural),
            resource_name_plural_snake: plural,
            fields,
            is_admin_resource: false,
        })
    }

    /// Mark the resource as admin-only
    #[must_use]
    pub const fn with_admin(mut self, admin: bool) -> Self {
        self.is_admin_resource = admin;
        self
    }

    /// Singular snake name
    #[must_use]
    pub fn snake(&self) -> &str {
        &self.resource_name_snake
    }

    /// Singular pascal name
    #[must_use]
    pub fn pascal(&self) -> &str {
        &self.resource_name_pascal
    }

    /// Plural snake name
    #[must_use]
    pub fn plural(&self) -> &str {
        &self.resource_name_plural_snake
    }
}
