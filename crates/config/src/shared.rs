//! Process-wide read-only descriptor.
//!
//! Installed once at startup, then read from anywhere without locking.

use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use std::sync::OnceLock;
use tracing::debug;

static INSTALLED: OnceLock<ConfigDescriptor> = OnceLock::new();

/// Install `descriptor` as this process's configuration.
///
/// Fails with `ConfigError::AlreadyInstalled` on any call after the first.
pub fn install(descriptor: ConfigDescriptor) -> Result<&'static ConfigDescriptor, ConfigError> {
    INSTALLED
        .set(descriptor)
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    let installed = INSTALLED.get().ok_or(ConfigError::AlreadyInstalled)?;
    debug!(compiler = %installed.compiler_version(), "toolchain configuration installed");
    Ok(installed)
}

/// The installed descriptor, if any.
pub fn installed() -> Option<&'static ConfigDescriptor> {
    INSTALLED.get()
}
