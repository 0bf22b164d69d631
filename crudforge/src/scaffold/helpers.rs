//! Naming helpers for code generation
//!
//! Plain suffix and separator rules, matching how the generated backend
//! names its modules and routes. Irregular plurals are not handled.

/// Naming-convention transforms used by templates and mutators
pub struct NamingHelpers;

impl NamingHelpers {
    /// Convert a `snake_case` name to `PascalCase`
    ///
    /// Splits on `_` and capitalizes each segment (first letter upper, rest
    /// lower).
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudforge::scaffold::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_pascal_case("logger_entry"), "LoggerEntry");
    /// assert_eq!(NamingHelpers::to_pascal_case("todo"), "Todo");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.split('_').map(capitalize).collect()
    }

    /// Convert a `snake_case` name to `camelCase`
    ///
    /// The first segment is kept as-is; later segments are capitalized.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudforge::scaffold::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_camel_case("category_id"), "categoryId");
    /// assert_eq!(NamingHelpers::to_camel_case("logged_at_utc"), "loggedAtUtc");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        let mut segments = input.split('_');
        let head = segments.next().unwrap_or_default().to_string();
        segments.fold(head, |mut acc, segment| {
            acc.push_str(&capitalize(segment));
            acc
        })
    }

    /// Pluralize a word
    ///
    /// `y` becomes `ies`, a trailing `s` gets `es`, anything else gets `s`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudforge::scaffold::NamingHelpers;
    /// assert_eq!(NamingHelpers::pluralize("category"), "categories");
    /// assert_eq!(NamingHelpers::pluralize("bus"), "buses");
    /// assert_eq!(NamingHelpers::pluralize("item"), "items");
    /// ```
    ///
    /// # Note
    ///
    /// Irregular plurals are not handled (`person` becomes `persons`,
    /// `key` becomes `keies`). Pick resource names accordingly.
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        if let Some(stem) = input.strip_suffix('y') {
            format!("{stem}ies")
        } else if input.ends_with('s') {
            format!("{input}es")
        } else {
            format!("{input}s")
        }
    }

    /// Check that a resource name is lowercase `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudforge::scaffold::NamingHelpers;
    /// assert!(NamingHelpers::is_snake_case("product_item"));
    /// assert!(!NamingHelpers::is_snake_case("ProductItem"));
    /// assert!(!NamingHelpers::is_snake_case("product-item"));
    /// ```
    #[must_use]
    pub fn is_snake_case(input: &str) -> bool {
        input.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && input
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
