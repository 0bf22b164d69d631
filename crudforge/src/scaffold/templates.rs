//! Template registry for code generation
//!
//! Every template is embedded in the binary. When an override directory is
//! configured, a file at `<override_dir>/<name>.j2` replaces the embedded
//! template of the same name, so `backend/model.py` can be customized by
//! dropping a `backend/model.py.j2` next to the project.

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde::Serialize;
use std::path::Path;

use super::field_type::FieldType;
use super::helpers::NamingHelpers;
use crate::error::{ForgeError, Result};

/// Backend ORM model
pub const MODEL: &str = "backend/model.py";
/// Backend validation schemas
pub const SCHEMA: &str = "backend/schema.py";
/// Backend CRUD object
pub const CRUD: &str = "backend/crud.py";
/// Backend API router
pub const ENDPOINT: &str = "backend/endpoint.py";
/// Frontend list/create proxy handler
pub const API_INDEX: &str = "frontend/api_index.js";
/// Frontend get/update/delete proxy handler
pub const API_ID: &str = "frontend/api_id.js";
/// Frontend page
pub const PAGE: &str = "frontend/page.js";
/// Frontend component
pub const COMPONENT: &str = "frontend/component.js";
/// State and handlers injected into an existing component
pub const API_CLIENT: &str = "frontend/api_client.js";

const EMBEDDED: &[(&str, &str)] = &[
    (MODEL, include_str!("../../templates/backend/model.py.j2")),
    (SCHEMA, include_str!("../../templates/backend/schema.py.j2")),
    (CRUD, include_str!("../../templates/backend/crud.py.j2")),
    (ENDPOINT, include_str!("../../templates/backend/endpoint.py.j2")),
    ("frontend/_auth.js", include_str!("../../templates/frontend/_auth.js.j2")),
    (API_INDEX, include_str!("../../templates/frontend/api_index.js.j2")),
    (API_ID, include_str!("../../templates/frontend/api_id.js.j2")),
    (PAGE, include_str!("../../templates/frontend/page.js.j2")),
    (COMPONENT, include_str!("../../templates/frontend/component.js.j2")),
    (API_CLIENT, include_str!("../../templates/frontend/api_client.js.j2")),
];

/// Loaded templates plus the filters they rely on
#[derive(Debug)]
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Create a registry from the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to compile.
    pub fn new() -> Result<Self> {
        Self::with_overrides(None)
    }

    /// Create a registry, preferring templates found in `override_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read, or if any
    /// template fails to compile.
    pub fn with_overrides(override_dir: Option<&Path>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_filter("sqlalchemy_type", sqlalchemy_type);
        env.add_filter("pydantic_type", pydantic_type);
        env.add_filter("js_default", js_default);
        env.add_filter("pascal", pascal);
        env.add_filter("plural", plural);
        env.add_filter("camel", camel);

        for &(name, source) in EMBEDDED {
            let custom = override_dir
                .map(|dir| dir.join(format!("{name}.j2")))
                .filter(|path| path.is_file());

            if let Some(path) = custom {
                tracing::debug!(template = name, path = %path.display(), "using template override");
                let source =
                    std::fs::read_to_string(&path).map_err(|e| ForgeError::io(&path, e))?;
                env.add_template_owned(name, source)?;
            } else {
                env.add_template(name, source)?;
            }
        }

        Ok(Self { env })
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }

    /// Names of every registered template
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }
}

fn field_type_filter(
    keyword: &str,
    map: fn(FieldType) -> &'static str,
) -> std::result::Result<String, minijinja::Error> {
    keyword
        .parse::<FieldType>()
        .map(|field_type| map(field_type).to_string())
        .map_err(|err| minijinja::Error::new(ErrorKind::InvalidOperation, err.to_string()))
}

fn sqlalchemy_type(keyword: &str) -> std::result::Result<String, minijinja::Error> {
    field_type_filter(keyword, FieldType::sqlalchemy_type)
}

fn pydantic_type(keyword: &str) -> std::result::Result<String, minijinja::Error> {
    field_type_filter(keyword, FieldType::pydantic_type)
}

fn js_default(keyword: &str) -> std::result::Result<String, minijinja::Error> {
    field_type_filter(keyword, FieldType::js_default)
}

fn pascal(value: &str) -> String {
    NamingHelpers::to_pascal_case(value)
}

fn plural(value: &str) -> String {
    NamingHelpers::pluralize(value)
}

fn camel(value: &str) -> String {
    NamingHelpers::to_camel_case(value)
}
