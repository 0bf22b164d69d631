//! Configuration management for crudforge
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `CRUDFORGE_` prefix, `__` for nesting)
//! 2. An explicit file passed by the caller (`--config`)
//! 3. `./crudforge.toml` (project-local)
//! 4. `~/.config/crudforge/config.toml` (user config, XDG)
//! 5. `/etc/crudforge/config.toml` (system config)
//! 6. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [workspace]
//! root = "/workspace"
//! backend_dir = "backend"
//! frontend_dir = "frontend"
//!
//! [templates]
//! override_dir = "./scaffold-templates"
//!
//! [logs]
//! file = "backend/logs/backend.log"
//! default_lines = 50
//!
//! [migrations]
//! tool = "alembic"
//! container = "backend"
//! container_workdir = "/code"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CRUDFORGE_";

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "crudforge.toml";

/// Where the scaffolded stack lives on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Workspace root containing the backend and frontend trees
    pub root: PathBuf,

    /// Backend project directory, relative to `root`
    pub backend_dir: PathBuf,

    /// Frontend project directory, relative to `root`
    pub frontend_dir: PathBuf,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            backend_dir: PathBuf::from("backend"),
            frontend_dir: PathBuf::from("frontend"),
        }
    }
}

/// Template lookup settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory whose files replace the embedded templates of the same name
    pub override_dir: Option<PathBuf>,
}

/// Backend log settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    /// Log file, relative to the workspace root unless absolute
    pub file: PathBuf,

    /// Number of trailing lines shown when none is requested
    pub default_lines: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("backend/logs/backend.log"),
            default_lines: 50,
        }
    }
}

/// Migration tool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MigrationSettings {
    /// Migration tool executable
    pub tool: String,

    /// Container runtime executable used for `exec` and `restart`
    pub container_runtime: String,

    /// Backend container name; migrations run locally when unset
    pub container: Option<String>,

    /// Working directory inside the backend container
    pub container_workdir: String,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            tool: "alembic".to_string(),
            container_runtime: "docker".to_string(),
            container: None,
            container_workdir: "/code".to_string(),
        }
    }
}

/// Complete crudforge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForgeConfig {
    /// Workspace layout
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// Template overrides
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Backend log reader
    #[serde(default)]
    pub logs: LogSettings,

    /// Migration driver
    #[serde(default)]
    pub migrations: MigrationSettings,
}

impl ForgeConfig {
    /// Load configuration from every standard location
    ///
    /// `explicit` is merged after the standard files and before the
    /// environment, so `--config` beats files but not `CRUDFORGE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file exists but contains invalid TOML
    /// - Values fail type conversion
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/crudforge/config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        if let Some(user_config) = Self::recommended_path() {
            if user_config.exists() {
                figment = figment.merge(Toml::file(&user_config));
            }
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Self::env_provider());

        let config = figment.extract()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a single file plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env_provider())
            .extract()?;
        Ok(config)
    }

    /// User-level configuration file (`~/.config/crudforge/config.toml`)
    #[must_use]
    pub fn recommended_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crudforge").join("config.toml"))
    }

    /// Replace the workspace root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace.root = root.into();
        self
    }

    fn defaults() -> Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn env_provider() -> Env {
        Env::prefixed(ENV_PREFIX).split("__").lowercase(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForgeConfig::default();
        assert_eq!(config.workspace.root, PathBuf::from("."));
        assert_eq!(config.workspace.backend_dir, PathBuf::from("backend"));
        assert_eq!(config.logs.default_lines, 50);
        assert_eq!(config.migrations.tool, "alembic");
        assert_eq!(config.migrations.container_workdir, "/code");
        assert!(config.migrations.container.is_none());
        assert!(config.templates.override_dir.is_none());
    }

    #[test]
    fn test_layering_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [workspace]
                root = "/srv/app"

                [migrations]
                container = "backend"
                "#,
            )?;
            jail.set_env("CRUDFORGE_LOGS__DEFAULT_LINES", "10");
            jail.set_env("CRUDFORGE_MIGRATIONS__CONTAINER", "api");

            let config = ForgeConfig::load_from("custom.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.workspace.root, PathBuf::from("/srv/app"));
            assert_eq!(config.workspace.frontend_dir, PathBuf::from("frontend"));
            assert_eq!(config.logs.default_lines, 10);
            assert_eq!(config.migrations.container.as_deref(), Some("api"));
            Ok(())
        });
    }

    #[test]
    fn test_with_root() {
        let config = ForgeConfig::default().with_root("/workspace");
        assert_eq!(config.workspace.root, PathBuf::from("/workspace"));
    }
}
