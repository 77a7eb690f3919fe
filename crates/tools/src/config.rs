//! Operator selection: which configuration file and which network.
//!
//! Resolved in priority order:
//!
//! 1. Command-line flags
//! 2. Environment variables (`TOOLCHAIN_CONFIG`, `TOOLCHAIN_NETWORK`), which
//!    may come from a `.env` file
//! 3. Discovery in the working directory / the descriptor's `defaultNetwork`

use std::path::{Path, PathBuf};
use thiserror::Error;
use toolchain_config::{ConfigDescriptor, ConfigError, NetworkParameters};
use tracing::debug;

pub const CONFIG_ENV: &str = "TOOLCHAIN_CONFIG";
pub const NETWORK_ENV: &str = "TOOLCHAIN_NETWORK";

/// Selection error types
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Env var error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Where the descriptor comes from and which profile to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Explicit configuration file; `None` means discover in `search_dir`.
    pub config_path: Option<PathBuf>,
    /// Directory searched when no path is given.
    pub search_dir: PathBuf,
    /// Network requested by name; `None` means the descriptor's default.
    pub network: Option<String>,
}

impl Selection {
    /// Resolve the selection from flags and the environment.
    pub fn resolve(
        config_flag: Option<PathBuf>,
        network_flag: Option<String>,
        search_dir: impl Into<PathBuf>,
    ) -> Result<Self, SelectionError> {
        // .env is optional
        let _ = dotenvy::dotenv();

        let config_path = match config_flag {
            Some(path) => Some(path),
            None => non_empty_env(CONFIG_ENV)?.map(PathBuf::from),
        };
        let network = match network_flag {
            Some(name) => Some(name),
            None => non_empty_env(NETWORK_ENV)?,
        };

        let selection = Selection {
            config_path,
            search_dir: search_dir.into(),
            network,
        };
        debug!(?selection, "operator selection resolved");
        Ok(selection)
    }

    /// Load the descriptor this selection points at.
    pub fn load(&self) -> Result<ConfigDescriptor, SelectionError> {
        let config = match &self.config_path {
            Some(path) => ConfigDescriptor::load(path)?,
            None => ConfigDescriptor::discover(&self.search_dir)?,
        };
        Ok(config)
    }

    /// Directory the project paths are anchored at.
    pub fn project_root(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(&self.search_dir)
    }

    /// The requested profile, or the descriptor's default when none was named.
    pub fn network<'a>(
        &'a self,
        config: &'a ConfigDescriptor,
    ) -> Result<(&'a str, &'a NetworkParameters), SelectionError> {
        match &self.network {
            Some(name) => Ok((name.as_str(), config.resolve_network(name)?)),
            None => Ok(config.default_network()),
        }
    }
}

fn non_empty_env(key: &str) -> Result<Option<String>, std::env::VarError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}
