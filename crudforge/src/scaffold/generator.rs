//! Scaffold generator orchestrator
//!
//! Coordinates everything a scaffolding operation touches:
//! - Backend model, schema, CRUD object and router
//! - Frontend API proxy handlers
//! - Router and model registration in existing backend files
//! - Single-file frontend pages and components
//! - API client injection into an existing component

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::context::ResourceContext;
use super::helpers::NamingHelpers;
use super::templates::{self, TemplateRegistry};
use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};
use crate::mutate::{self, FileChange, WriteMode};
use crate::workspace::Workspace;

/// Represents a rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

/// Everything `create_resource` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReport {
    /// Singular snake name of the resource
    pub resource: String,
    /// Newly generated files
    pub files: Vec<FileChange>,
    /// Edits to the router aggregator and model initializer
    pub registrations: Vec<FileChange>,
}

impl ResourceReport {
    /// Every file change, generated files first
    pub fn changes(&self) -> impl Iterator<Item = &FileChange> {
        self.files.iter().chain(&self.registrations)
    }
}

impl fmt::Display for ResourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resource '{}':", self.resource)?;
        for change in self.changes() {
            writeln!(f, "  [{}] {}", change.kind, change.path.display())?;
        }
        Ok(())
    }
}

/// Renders templates and applies them to a workspace
#[derive(Debug)]
pub struct ScaffoldGenerator {
    workspace: Workspace,
    templates: TemplateRegistry,
}

impl ScaffoldGenerator {
    /// Create a generator for a workspace
    #[must_use]
    pub const fn new(workspace: Workspace, templates: TemplateRegistry) -> Self {
        Self {
            workspace,
            templates,
        }
    }

    /// Create a generator from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a template override cannot be read or compiled.
    pub fn from_config(config: &ForgeConfig) -> Result<Self> {
        let templates = TemplateRegistry::with_overrides(config.templates.override_dir.as_deref())?;
        Ok(Self::new(Workspace::from_config(config), templates))
    }

    /// Workspace this generator writes into
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Render the backend and frontend files of a resource
    ///
    /// # Errors
    ///
    /// Returns an error if any template fails to render.
    pub fn render_resource(&self, ctx: &ResourceContext) -> Result<Vec<GeneratedFile>> {
        let snake = ctx.snake();
        let plural = ctx.plural();
        let pascal = ctx.pascal();
        let app = self.workspace.backend_app();
        let api = self.workspace.frontend_src().join("pages/api").join(plural);

        let targets = [
            (
                templates::MODEL,
                app.join(format!("models/{snake}.py")),
                format!("ORM model for {pascal}"),
            ),
            (
                templates::SCHEMA,
                app.join(format!("db/schemas/{snake}.py")),
                format!("Validation schemas for {pascal}"),
            ),
            (
                templates::CRUD,
                app.join(format!("crud/crud_{snake}.py")),
                format!("CRUD object for {pascal}"),
            ),
            (
                templates::ENDPOINT,
                app.join(format!("api/v1/endpoints/{plural}.py")),
                format!("API endpoints for {plural}"),
            ),
            (
                templates::API_INDEX,
                api.join("index.js"),
                format!("Frontend list/create handler for {plural}"),
            ),
            (
                templates::API_ID,
                api.join(format!("[{snake}_id].js")),
                format!("Frontend get/update/delete handler for {plural}"),
            ),
        ];

        targets
            .into_iter()
            .map(|(template, path, description)| -> Result<GeneratedFile> {
                Ok(GeneratedFile {
                    content: self.templates.render(template, ctx)?,
                    path,
                    description,
                })
            })
            .collect()
    }

    /// Render a frontend page
    ///
    /// # Errors
    ///
    /// Returns an error if the page name is not a plain file name, or if the
    /// template fails to render.
    pub fn render_page(&self, page_name: &str) -> Result<GeneratedFile> {
        let valid = !page_name.is_empty()
            && page_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ForgeError::invalid_name(
                page_name,
                "page names may only contain letters, digits, '-' and '_'",
            ));
        }

        let page_name_pascal = NamingHelpers::to_pascal_case(&page_name.replace('-', "_"));
        let content = self.templates.render(
            templates::PAGE,
            serde_json::json!({ "page_name": page_name, "page_name_pascal": page_name_pascal }),
        )?;

        Ok(GeneratedFile {
            path: self
                .workspace
                .frontend_src()
                .join(format!("pages/{page_name}.js")),
            content,
            description: format!("Frontend page {page_name_pascal}"),
        })
    }

    /// Render a frontend component under `components/<subdir>`
    ///
    /// # Errors
    ///
    /// Returns an error if the component name is not `PascalCase`, if
    /// `subdir` escapes the components directory, or if rendering fails.
    pub fn render_component(
        &self,
        component_name: &str,
        subdir: &Path,
        prompt: Option<&str>,
    ) -> Result<GeneratedFile> {
        let valid = component_name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
            && component_name.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(ForgeError::invalid_name(
                component_name,
                "component names must be PascalCase (e.g., 'UserProfile')",
            ));
        }
        if !subdir.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(ForgeError::invalid_name(
                &subdir.display().to_string(),
                "component path must stay inside frontend/src/components",
            ));
        }

        let content = self.templates.render(
            templates::COMPONENT,
            serde_json::json!({ "component_name": component_name, "prompt": prompt }),
        )?;

        Ok(GeneratedFile {
            path: self
                .workspace
                .frontend_src()
                .join("components")
                .join(subdir)
                .join(format!("{component_name}.js")),
            content,
            description: format!("Frontend component {component_name}"),
        })
    }

    /// Render the API client snippet for a resource
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_api_client(&self, ctx: &ResourceContext) -> Result<String> {
        self.templates.render(templates::API_CLIENT, ctx)
    }

    /// Write a rendered file, overwriting whatever is there
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file cannot be read or the new one
    /// cannot be written.
    pub fn write(&self, file: &GeneratedFile, mode: WriteMode) -> Result<FileChange> {
        let full = self.workspace.resolve(&file.path);
        let existing = if full.is_file() {
            Some(std::fs::read_to_string(&full).map_err(|e| ForgeError::io(&full, e))?)
        } else {
            None
        };

        mutate::commit(
            &self.workspace,
            &file.path,
            existing.as_deref(),
            &file.content,
            mode,
            file.description.clone(),
        )
    }

    /// Generate a resource and wire it into the backend
    ///
    /// Every template is rendered before anything is written. Generated
    /// files are overwritten unconditionally; the router aggregator and model
    /// initializer are edited idempotently and skipped if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or a file cannot be written. Files
    /// written before the failure are kept.
    pub fn create_resource(&self, ctx: &ResourceContext, mode: WriteMode) -> Result<ResourceReport> {
        let rendered = self.render_resource(ctx)?;

        let files = rendered
            .iter()
            .map(|file| self.write(file, mode))
            .collect::<Result<Vec<_>>>()?;

        let registrations = vec![
            mutate::register_router(&self.workspace, ctx.plural(), mode)?,
            mutate::register_model(&self.workspace, ctx.snake(), ctx.pascal(), mode)?,
        ];

        let dry_run = mode == WriteMode::DryRun;
        tracing::info!(
            resource = ctx.snake(),
            admin = ctx.is_admin_resource,
            files = files.len(),
            dry_run,
            "resource scaffolded"
        );

        Ok(ResourceReport {
            resource: ctx.snake().to_string(),
            files,
            registrations,
        })
    }

    /// Generate a frontend page
    ///
    /// # Errors
    ///
    /// See [`Self::render_page`] and [`Self::write`].
    pub fn create_page(&self, page_name: &str, mode: WriteMode) -> Result<FileChange> {
        let file = self.render_page(page_name)?;
        let change = self.write(&file, mode)?;
        tracing::info!(page = page_name, path = %change.path.display(), "page created");
        Ok(change)
    }

    /// Generate a frontend component
    ///
    /// # Errors
    ///
    /// See [`Self::render_component`] and [`Self::write`].
    pub fn create_component(
        &self,
        component_name: &str,
        subdir: &Path,
        prompt: Option<&str>,
        mode: WriteMode,
    ) -> Result<FileChange> {
        let file = self.render_component(component_name, subdir, prompt)?;
        let change = self.write(&file, mode)?;
        tracing::info!(component = component_name, path = %change.path.display(), "component created");
        Ok(change)
    }

    /// Inject API client code for a resource into a file under `frontend/src`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has no default-exported
    /// function, or rendering fails. The file is untouched on error.
    pub fn create_api_client(
        &self,
        file: &Path,
        ctx: &ResourceContext,
        mode: WriteMode,
    ) -> Result<FileChange> {
        let code = self.render_api_client(ctx)?;
        let change = mutate::inject_api_client(&self.workspace, file, &code, mode)?;
        tracing::info!(resource = ctx.snake(), path = %change.path.display(), "API client injected");
        Ok(change)
    }
}
