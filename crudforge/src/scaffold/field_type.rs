//! Field type definitions and parser for resource scaffolding
//!
//! Fields are given on the command line as `name:type:required`.
//!
//! # Supported Field Types
//!
//! | type       | ORM column | schema annotation | form default |
//! |------------|------------|-------------------|--------------|
//! | `string`   | `String`   | `str`             | `''`         |
//! | `text`     | `Text`     | `str`             | `''`         |
//! | `integer`  | `Integer`  | `int`             | `0`          |
//! | `float`    | `Float`    | `float`           | `0`          |
//! | `boolean`  | `Boolean`  | `bool`            | `false`      |
//! | `date`     | `Date`     | `date`            | `''`         |
//! | `datetime` | `DateTime` | `datetime`        | `''`         |
//! | `uuid`     | `Uuid`     | `UUID`            | `''`         |
//!
//! # Required Flag
//!
//! `true`, `1`, `t`, `y` and `yes` (any case) mean required; every other
//! token means optional.
//!
//! # Examples
//!
//! ```text
//! title:string:true        → required str column
//! count:integer:false      → nullable int column
//! published_at:datetime:yes
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ForgeError, Result};

/// Tokens accepted as "required"
const TRUE_TOKENS: &[&str] = &["true", "1", "t", "y", "yes"];

/// Represents a field definition parsed from user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name (e.g., "title", "`category_id`")
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the column is non-nullable and the schema field mandatory
    #[serde(default = "default_required")]
    pub required: bool,
}

const fn default_required() -> bool {
    true
}

/// Closed set of supported column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Short string
    String,
    /// Unbounded text
    Text,
    /// Integer
    Integer,
    /// Floating point number
    Float,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    #[serde(rename = "datetime")]
    DateTime,
    /// UUID
    Uuid,
}

impl FieldDefinition {
    /// Parse a field definition from a string
    ///
    /// Format: `name:type:required`
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudforge::scaffold::{FieldDefinition, FieldType};
    /// let field = FieldDefinition::parse("title:string:true").unwrap();
    /// assert_eq!(field.name, "title");
    /// assert_eq!(field.field_type, FieldType::String);
    /// assert!(field.required);
    ///
    /// let field = FieldDefinition::parse("count:integer:no").unwrap();
    /// assert!(!field.required);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The definition does not have exactly three `:`-separated parts
    /// - The name is empty or not an identifier
    /// - The type is not one of the supported types
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        let [name, type_str, required] = parts.as_slice() else {
            return Err(ForgeError::invalid_field(
                input,
                "Field definition must be in 'name:type:required' format.",
            ));
        };

        let name = name.trim();
        validate_identifier(name).map_err(|reason| ForgeError::invalid_field(input, reason))?;

        let field_type = type_str
            .trim()
            .parse::<FieldType>()
            .map_err(|err| ForgeError::invalid_field(input, err.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            field_type,
            required: parse_required(required),
        })
    }

    /// Build a definition from already separated parts
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not an identifier or the type is not
    /// supported.
    pub fn from_parts(name: &str, field_type: &str, required: bool) -> Result<Self> {
        let definition = format!("{name}:{field_type}:{required}");
        let name = name.trim();
        validate_identifier(name).map_err(|reason| ForgeError::invalid_field(&definition, reason))?;
        let field_type = field_type
            .trim()
            .parse::<FieldType>()
            .map_err(|err| ForgeError::invalid_field(&definition, err.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            field_type,
            required,
        })
    }

    /// Parse every definition, failing on the first invalid one
    ///
    /// # Errors
    ///
    /// Returns the error of the first definition that fails to parse.
    pub fn parse_all<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Self>> {
        inputs.iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    /// ORM column type name
    #[must_use]
    pub const fn sqlalchemy_type(&self) -> &'static str {
        self.field_type.sqlalchemy_type()
    }

    /// Validation-schema annotation
    #[must_use]
    pub const fn pydantic_type(&self) -> &'static str {
        self.field_type.pydantic_type()
    }
}

/// Interpret the third part of a definition
#[must_use]
pub fn parse_required(token: &str) -> bool {
    let token = token.trim().to_lowercase();
    TRUE_TOKENS.contains(&token.as_str())
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => Err("Field name cannot be empty".to_string()),
        Some(first) if !(first.is_ascii_alphabetic() || first == '_') => Err(format!(
            "Invalid field name '{name}': must start with a letter or underscore"
        )),
        Some(_) if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => Err(format!(
            "Invalid field name '{name}': only letters, digits and underscores are allowed"
        )),
        Some(_) => Ok(()),
    }
}

impl FieldType {
    /// Every supported type, in documentation order
    pub const ALL: [Self; 8] = [
        Self::String,
        Self::Text,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::Uuid,
    ];

    /// Grammar keyword for this type
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Uuid => "uuid",
        }
    }

    /// ORM column type name
    #[must_use]
    pub const fn sqlalchemy_type(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Uuid => "Uuid",
        }
    }

    /// Validation-schema annotation
    #[must_use]
    pub const fn pydantic_type(self) -> &'static str {
        match self {
            Self::String | Self::Text => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Uuid => "UUID",
        }
    }

    /// Initial value for a frontend form input
    #[must_use]
    pub const fn js_default(self) -> &'static str {
        match self {
            Self::Integer | Self::Float => "0",
            Self::Boolean => "false",
            Self::String | Self::Text | Self::Date | Self::DateTime | Self::Uuid => "''",
        }
    }
}

impl FromStr for FieldType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.keyword() == s)
            .ok_or_else(|| ForgeError::UnknownFieldType(s.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.field_type, self.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_required_string() {
        let field = FieldDefinition::parse("title:string:true").unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.field_type, FieldType::String);
        assert!(field.required);
        assert_eq!(field.sqlalchemy_type(), "String");
        assert_eq!(field.pydantic_type(), "str");
    }

    #[test]
    fn test_parse_trims_parts() {
        let field = FieldDefinition::parse(" count : integer : Yes ").unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.field_type, FieldType::Integer);
        assert!(field.required);
    }

    #[test]
    fn test_required_tokens() {
        for token in ["true", "TRUE", "1", "t", "T", "y", "yes", "Yes"] {
            assert!(parse_required(token), "{token} should be required");
        }
        for token in ["false", "0", "no", "n", "", "required", "truthy"] {
            assert!(!parse_required(token), "{token} should be optional");
        }
    }

    #[test]
    fn test_all_types_map() {
        let cases = [
            ("string", "String", "str"),
            ("text", "Text", "str"),
            ("integer", "Integer", "int"),
            ("float", "Float", "float"),
            ("boolean", "Boolean", "bool"),
            ("date", "Date", "date"),
            ("datetime", "DateTime", "datetime"),
            ("uuid", "Uuid", "UUID"),
        ];
        for (keyword, orm, schema) in cases {
            let field = FieldDefinition::parse(&format!("f:{keyword}:true")).unwrap();
            assert_eq!(field.field_type.keyword(), keyword);
            assert_eq!(field.sqlalchemy_type(), orm);
            assert_eq!(field.pydantic_type(), schema);
        }
    }

    #[test]
    fn test_wrong_part_count() {
        assert!(FieldDefinition::parse("title").is_err());
        assert!(FieldDefinition::parse("title:string").is_err());
        assert!(FieldDefinition::parse("title:string:true:extra").is_err());
    }

    #[test]
    fn test_unknown_type() {
        let err = FieldDefinition::parse("price:decimal:true").unwrap_err();
        assert!(err.to_string().contains("Invalid field type: decimal"));
        // keywords are case-sensitive
        assert!(FieldDefinition::parse("title:String:true").is_err());
    }

    #[test]
    fn test_invalid_names() {
        assert!(FieldDefinition::parse(":string:true").is_err());
        assert!(FieldDefinition::parse("1st:string:true").is_err());
        assert!(FieldDefinition::parse("first-name:string:true").is_err());
    }

    #[test]
    fn test_parse_all_stops_at_first_error() {
        let err = FieldDefinition::parse_all(&["a:string:true", "b:blob:true", "c:nope"])
            .unwrap_err();
        assert!(err.to_string().contains("'b:blob:true'"));
    }

    #[test]
    fn test_structured_input_defaults_required() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name": "title", "type": "string"}"#).unwrap();
        assert!(field.required);
        assert_eq!(field.field_type, FieldType::String);

        let field: FieldDefinition =
            serde_json::from_str(r#"{"name": "at", "type": "datetime", "required": false}"#)
                .unwrap();
        assert_eq!(field.field_type, FieldType::DateTime);
        assert!(!field.required);
    }

    #[test]
    fn test_from_parts_validates() {
        let field = FieldDefinition::from_parts(" category_id ", "integer", true).unwrap();
        assert_eq!(field.name, "category_id");
        assert_eq!(field.field_type, FieldType::Integer);

        let err = FieldDefinition::from_parts("bad name", "string", true).unwrap_err();
        assert!(err.to_string().contains("'bad name:string:true'"));
        assert!(FieldDefinition::from_parts("ok", "money", false).is_err());
    }

    #[test]
    fn test_display() {
        let field = FieldDefinition::parse("done:boolean:y").unwrap();
        assert_eq!(field.to_string(), "done:boolean:true");
    }

    proptest! {
        #[test]
        fn prop_valid_definitions_round_trip(
            name in "[a-z_][a-z0-9_]{0,15}",
            type_idx in 0usize..8,
            required in any::<bool>(),
        ) {
            let field_type = FieldType::ALL[type_idx];
            let input = format!("{name}:{field_type}:{required}");
            let field = FieldDefinition::parse(&input).unwrap();
            prop_assert_eq!(field.name, name);
            prop_assert_eq!(field.field_type, field_type);
            prop_assert_eq!(field.required, required);
        }
    }
}
