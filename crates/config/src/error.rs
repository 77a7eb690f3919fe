use std::path::PathBuf;
use thiserror::Error;

/// Field name used when a failure cannot be pinned to a single key.
pub const ROOT_FIELD: &str = "<root>";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema error in `{field}`: {reason}")]
    Schema { field: String, reason: String },

    #[error("Network profile not found: {0}")]
    NetworkNotFound(String),

    #[error("Unsupported configuration format: {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("No configuration file found in {} (looked for toolchain.json, toolchain.toml)", .0.display())]
    NotFoundConfig(PathBuf),

    #[error("Configuration already installed for this process")]
    AlreadyInstalled,
}

impl ConfigError {
    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The source does not conform to the expected shape.
    pub fn is_schema(&self) -> bool {
        matches!(self, ConfigError::Schema { .. })
    }

    /// A requested network profile has no entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NetworkNotFound(_))
    }

    /// Offending field for schema errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Schema { field, .. } => Some(field),
            _ => None,
        }
    }
}
