//! Error types for the scaffolding engine

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T, E = ForgeError> = std::result::Result<T, E>;

/// Engine error type
#[derive(Debug, Error)]
pub enum ForgeError {
    /// A `name:type:required` definition could not be parsed
    #[error("Error parsing field definition '{definition}': {reason}")]
    InvalidField {
        /// The raw definition as given by the caller
        definition: String,
        /// Why it was rejected
        reason: String,
    },

    /// Field type is not one of the supported types
    #[error("Invalid field type: {0}")]
    UnknownFieldType(String),

    /// Resource, page or component name is unusable
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A file the operation depends on does not exist
    #[error("File not found at {}", .0.display())]
    FileNotFound(PathBuf),

    /// Filesystem error with the path that caused it
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Template lookup or rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A textual edit could not find where to apply itself
    #[error("Could not find {what} in {}", path.display())]
    InjectionPointNotFound {
        /// File being edited
        path: PathBuf,
        /// Description of the missing anchor
        what: String,
    },

    /// Backend schema could not be analyzed
    #[error("Error parsing schema {}: {reason}", path.display())]
    Schema {
        /// Schema file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// External migration tool or container runtime failed
    #[error("Error {step}: {output}")]
    Process {
        /// Step description (e.g. "creating revision")
        step: String,
        /// Captured output of the failed command, verbatim
        output: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Default configuration could not be serialized
    #[error("Configuration error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Global log subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl ForgeError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_field(definition: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for ForgeError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
