//! Path layout of the scaffolded backend/frontend stack

use std::path::{Path, PathBuf};

use crate::config::ForgeConfig;

/// Resolves every path the engine reads or writes
///
/// All paths are joined onto the configured workspace root. Generated files
/// are reported relative to that root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    backend: PathBuf,
    frontend: PathBuf,
}

impl Workspace {
    /// Build a layout with the default `backend/` and `frontend/` directories
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backend: PathBuf::from("backend"),
            frontend: PathBuf::from("frontend"),
        }
    }

    /// Build a layout from loaded configuration
    #[must_use]
    pub fn from_config(config: &ForgeConfig) -> Self {
        Self {
            root: config.workspace.root.clone(),
            backend: config.workspace.backend_dir.clone(),
            frontend: config.workspace.frontend_dir.clone(),
        }
    }

    /// Workspace root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backend project directory (absolute or root-relative)
    #[must_use]
    pub fn backend_dir(&self) -> PathBuf {
        self.root.join(&self.backend)
    }

    /// Backend `app` package, relative to the root
    #[must_use]
    pub fn backend_app(&self) -> PathBuf {
        self.backend.join("app")
    }

    /// Frontend `src` directory, relative to the root
    #[must_use]
    pub fn frontend_src(&self) -> PathBuf {
        self.frontend.join("src")
    }

    /// Router aggregator, relative to the root
    #[must_use]
    pub fn routers_file(&self) -> PathBuf {
        self.backend_app().join("api/v1/routers.py")
    }

    /// Model package initializer, relative to the root
    #[must_use]
    pub fn models_init(&self) -> PathBuf {
        self.backend_app().join("models/__init__.py")
    }

    /// Backend schema module for a resource, relative to the root
    #[must_use]
    pub fn schema_file(&self, resource_snake: &str) -> PathBuf {
        self.backend_app()
            .join("db/schemas")
            .join(format!("{resource_snake}.py"))
    }

    /// Frontend middleware holding the protected route arrays, relative to the root
    #[must_use]
    pub fn middleware_file(&self) -> PathBuf {
        self.frontend_src().join("middleware.js")
    }

    /// Join a root-relative path onto the workspace root
    #[must_use]
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Strip the workspace root from a path for display
    #[must_use]
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
