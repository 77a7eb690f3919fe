use std::fs;
use tempfile::TempDir;
use toolchain_config::{ConfigDescriptor, ConfigError, DEFAULT_NETWORK};

const JSON_SOURCE: &str = r#"{
    "compilerVersion": "0.8.18",
    "networks": {
        "hardhat": {},
        "localhost": { "url": "http://127.0.0.1:8545" }
    }
}"#;

const TOML_SOURCE: &str = r#"
compilerVersion = "0.8.18"

[networks.hardhat]

[networks.localhost]
url = "http://127.0.0.1:8545"
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "toolchain.json", JSON_SOURCE);

    let config = ConfigDescriptor::load(&path).unwrap();
    assert_eq!(config.compiler_version().to_string(), "0.8.18");
    assert_eq!(
        config.resolve_network("localhost").unwrap().endpoint(),
        "http://127.0.0.1:8545"
    );
    assert!(config.resolve_network(DEFAULT_NETWORK).unwrap().is_in_process());
    assert!(config.resolve_network("staging").unwrap_err().is_not_found());
}

#[test]
fn test_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "toolchain.json", JSON_SOURCE);

    let first = ConfigDescriptor::load(&path).unwrap();
    let second = ConfigDescriptor::load(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_and_toml_files_agree() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "toolchain.json", JSON_SOURCE);
    let toml = write(&dir, "toolchain.toml", TOML_SOURCE);

    assert_eq!(
        ConfigDescriptor::load(json).unwrap(),
        ConfigDescriptor::load(toml).unwrap()
    );
}

#[test]
fn test_missing_compiler_version_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "toolchain.json", r#"{ "networks": {} }"#);

    let err = ConfigDescriptor::load(path).unwrap_err();
    assert!(err.is_schema());
    assert_eq!(err.field(), Some("compilerVersion"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ConfigDescriptor::load(dir.path().join("toolchain.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "hardhat.config.js", "module.exports = {};");
    let err = ConfigDescriptor::load(path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn test_discover_prefers_json() {
    let dir = TempDir::new().unwrap();
    write(&dir, "toolchain.toml", "compilerVersion = \"0.8.20\"\n");
    write(&dir, "toolchain.json", JSON_SOURCE);

    let config = ConfigDescriptor::discover(dir.path()).unwrap();
    assert_eq!(config.compiler_version().to_string(), "0.8.18");
}

#[test]
fn test_discover_falls_back_to_toml() {
    let dir = TempDir::new().unwrap();
    write(&dir, "toolchain.toml", TOML_SOURCE);

    let config = ConfigDescriptor::discover(dir.path()).unwrap();
    assert!(config.resolve_network("localhost").is_ok());
}

#[test]
fn test_discover_empty_dir() {
    let dir = TempDir::new().unwrap();
    let err = ConfigDescriptor::discover(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFoundConfig(_)));
}

#[test]
fn test_shared_across_threads() {
    let config = std::sync::Arc::new(ConfigDescriptor::from_json_str(JSON_SOURCE).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = std::sync::Arc::clone(&config);
            std::thread::spawn(move || {
                config
                    .resolve_network("localhost")
                    .map(|p| p.endpoint().to_string())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "http://127.0.0.1:8545");
    }
}

#[test]
fn test_repository_config_is_valid() {
    let config = ConfigDescriptor::from_json_str(include_str!("../../../toolchain.json")).unwrap();
    assert_eq!(config.compiler_version().to_string(), "0.8.18");
    assert_eq!(config.network_names().collect::<Vec<_>>(), ["hardhat", "localhost"]);
}
