//! The configuration descriptor and its loader.
//!
//! A descriptor is built once from a static source and never changes
//! afterwards. Every check runs while loading, so a descriptor that exists is
//! a descriptor that is valid: lookups never re-validate.
//!
//! # Examples
//!
//! ```rust
//! use toolchain_config::{ConfigDescriptor, DEFAULT_NETWORK};
//!
//! # fn main() -> Result<(), toolchain_config::ConfigError> {
//! let config = ConfigDescriptor::from_json_str(
//!     r#"{
//!         "compilerVersion": "0.8.18",
//!         "networks": {
//!             "hardhat": {},
//!             "localhost": { "url": "http://127.0.0.1:8545" }
//!         }
//!     }"#,
//! )?;
//! assert!(config.resolve_network(DEFAULT_NETWORK)?.is_in_process());
//! assert_eq!(config.resolve_network("localhost")?.endpoint(), "http://127.0.0.1:8545");
//! # Ok(())
//! # }
//! ```

use crate::error::{ConfigError, ROOT_FIELD};
use crate::network::{NetworkParameters, RawNetwork, DEFAULT_NETWORK};
use crate::source::{self, SourceValue};
use crate::version::{self, parse_compiler_version};
use semver::Version;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// File names searched by [`ConfigDescriptor::discover`], in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["toolchain.json", "toolchain.toml"];

/// Optimizer runs used when the source enables the optimizer without a count.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Compiler optimizer settings passed through to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Optimizer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_runs")]
    pub runs: u32,
}

fn default_runs() -> u32 {
    DEFAULT_OPTIMIZER_RUNS
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// Project directories, relative to the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectPaths {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            sources: "contracts".into(),
            tests: "test".into(),
            cache: "cache".into(),
            artifacts: "artifacts".into(),
        }
    }
}

impl ProjectPaths {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in self.entries() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::schema(
                    format!("paths.{name}"),
                    "path must not be empty",
                ));
            }
        }
        Ok(())
    }

    fn entries(&self) -> [(&'static str, &PathBuf); 4] {
        [
            ("sources", &self.sources),
            ("tests", &self.tests),
            ("cache", &self.cache),
            ("artifacts", &self.artifacts),
        ]
    }

    /// Same directories, anchored at `root` unless already absolute.
    pub fn anchored_at(&self, root: &Path) -> ProjectPaths {
        ProjectPaths {
            sources: root.join(&self.sources),
            tests: root.join(&self.tests),
            cache: root.join(&self.cache),
            artifacts: root.join(&self.artifacts),
        }
    }
}

/// Loaded, validated toolchain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDescriptor {
    compiler_version: Version,
    optimizer: Optimizer,
    default_network: String,
    plugins: Vec<String>,
    paths: ProjectPaths,
    networks: BTreeMap<String, NetworkParameters>,
}

/// Top-level record as written in the source. Each field stays untyped until
/// validation so errors can name the field they came from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    compiler_version: Option<SourceValue>,
    optimizer: Option<SourceValue>,
    default_network: Option<SourceValue>,
    plugins: Option<SourceValue>,
    paths: Option<SourceValue>,
    networks: Option<Entries>,
}

/// Map entries in source order, duplicates included.
#[derive(Debug, Default)]
struct Entries(Vec<(String, SourceValue)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of network profile names to parameters")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Entries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, SourceValue>()? {
                    entries.push((key, value));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Decode one untyped field, naming it on failure. Repeated keys anywhere
/// inside the field are refused.
fn typed<T: DeserializeOwned>(field: &str, raw: SourceValue) -> Result<T, ConfigError> {
    if let Some(path) = raw.duplicate {
        return Err(ConfigError::schema(source::join(field, &path), "duplicate key"));
    }
    serde_json::from_value(raw.value).map_err(|e| ConfigError::schema(field, e.to_string()))
}

impl ConfigDescriptor {
    /// Load a descriptor from a `.json` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the file cannot be read
    /// - the extension is neither `json` nor `toml`
    /// - the contents fail validation (see [`ConfigDescriptor::from_json_str`])
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = SourceFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), ?format, "loading toolchain configuration");
        match format {
            SourceFormat::Json => Self::from_json_str(&content),
            SourceFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Find and load the first of [`CONFIG_FILE_NAMES`] present in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::load(candidate);
            }
        }
        Err(ConfigError::NotFoundConfig(dir.to_path_buf()))
    }

    /// Parse and validate a JSON source.
    ///
    /// # Errors
    ///
    /// `ConfigError::Schema` naming the offending field when:
    /// - `compilerVersion` is absent, not a string, or not an exact version
    /// - a profile other than the in-process one lacks a valid `url`
    /// - the in-process profile carries a `url`
    /// - two profiles share a name
    /// - `defaultNetwork` names no profile
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(source)
            .map_err(|e| ConfigError::schema(ROOT_FIELD, e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse and validate a TOML source. Same rules as JSON.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(source).map_err(|e| ConfigError::schema(ROOT_FIELD, e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let compiler_version = match raw.compiler_version {
            None => return Err(ConfigError::schema(version::FIELD, "missing required field")),
            Some(value) => {
                let text: String = typed(version::FIELD, value)?;
                parse_compiler_version(&text)?
            }
        };

        let optimizer = raw
            .optimizer
            .map(|v| typed::<Optimizer>("optimizer", v))
            .transpose()?
            .unwrap_or_default();

        let paths = raw
            .paths
            .map(|v| typed::<ProjectPaths>("paths", v))
            .transpose()?
            .unwrap_or_default();
        paths.validate()?;

        let plugins = raw
            .plugins
            .map(|v| typed::<Vec<String>>("plugins", v))
            .transpose()?
            .unwrap_or_default();
        validate_plugins(&plugins)?;

        let networks = validate_networks(raw.networks.unwrap_or_default())?;

        let default_network = raw
            .default_network
            .map(|v| typed::<String>("defaultNetwork", v))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        if !networks.contains_key(&default_network) {
            return Err(ConfigError::schema(
                "defaultNetwork",
                format!("`{default_network}` is not a configured network profile"),
            ));
        }

        debug!(
            compiler = %compiler_version,
            networks = networks.len(),
            default_network = %default_network,
            "toolchain configuration validated"
        );

        Ok(Self {
            compiler_version,
            optimizer,
            default_network,
            plugins,
            paths,
            networks,
        })
    }

    /// Look up a network profile by name. Never falls back to the default.
    pub fn resolve_network(&self, name: &str) -> Result<&NetworkParameters, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::NetworkNotFound(name.to_string()))
    }

    /// The profile named by `defaultNetwork`.
    pub fn default_network(&self) -> (&str, &NetworkParameters) {
        // Present by construction: `from_raw` rejects a dangling default.
        let params = &self.networks[&self.default_network];
        (&self.default_network, params)
    }

    pub fn compiler_version(&self) -> &Version {
        &self.compiler_version
    }

    pub fn optimizer(&self) -> Optimizer {
        self.optimizer
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Profile names in sorted order.
    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn networks(&self) -> &BTreeMap<String, NetworkParameters> {
        &self.networks
    }

    /// Project directories as written, relative to the configuration file.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Project directories anchored at `root`, usually the directory holding
    /// the configuration file.
    pub fn project_paths(&self, root: impl AsRef<Path>) -> ProjectPaths {
        self.paths.anchored_at(root.as_ref())
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn validate_networks(
    entries: Entries,
) -> Result<BTreeMap<String, NetworkParameters>, ConfigError> {
    let mut seen = BTreeSet::new();
    let mut networks = BTreeMap::new();

    for (name, value) in entries.0 {
        if name.trim().is_empty() {
            return Err(ConfigError::schema(
                "networks",
                "network profile names must not be empty",
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(ConfigError::schema(
                format!("networks.{name}"),
                "duplicate network profile",
            ));
        }

        let raw: RawNetwork = typed(&format!("networks.{name}"), value)?;
        let params = raw.validate(&name)?;
        trace!(network = %name, endpoint = params.endpoint(), "network profile accepted");
        networks.insert(name, params);
    }

    if !networks.contains_key(DEFAULT_NETWORK) {
        warn!(
            network = DEFAULT_NETWORK,
            "in-process network not declared; adding it with no parameters"
        );
        networks.insert(DEFAULT_NETWORK.to_string(), NetworkParameters::in_process());
    }

    Ok(networks)
}

fn validate_plugins(plugins: &[String]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for (i, plugin) in plugins.iter().enumerate() {
        if plugin.trim().is_empty() {
            return Err(ConfigError::schema(
                format!("plugins[{i}]"),
                "plugin name must not be empty",
            ));
        }
        if !seen.insert(plugin.as_str()) {
            return Err(ConfigError::schema(
                format!("plugins[{i}]"),
                format!("plugin `{plugin}` listed twice"),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Json,
    Toml,
}

impl SourceFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(SourceFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(SourceFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
