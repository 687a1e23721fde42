//! Integration tests for configuration loading
//!
//! Tests touching process environment run under `#[serial]`.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use testbed::config::{Config, LogFormat, LogLevel};
use testbed::error::{Error, ErrorKind};

const ENV_VARS: &[&str] = &[
    "TESTBED_CONFIG",
    "TESTBED_INVENTORY",
    "TESTBED_TARGET",
    "TESTBED_LOG_LEVEL",
    "TESTBED_LOG_FORMAT",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_load_explicit_toml() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "testbed.toml",
        r#"
[defaults]
inventory = "fixtures/inventory.yaml"
target = "a.example.com"

[logging]
level = "debug"
"#,
    );

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(
        config.inventory_path(),
        Some(Path::new("fixtures/inventory.yaml"))
    );
    assert_eq!(config.selector(), Some("a.example.com"));
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
#[serial]
fn test_load_yaml_and_json_by_extension() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let yaml = write_config(&dir, "testbed.yaml", "defaults:\n  target: web1\n");
    assert_eq!(Config::load(Some(yaml.as_path())).unwrap().selector(), Some("web1"));

    let json = write_config(&dir, "testbed.json", r#"{"logging": {"format": "json"}}"#);
    assert_eq!(Config::load(Some(json.as_path())).unwrap().logging.format, LogFormat::Json);
}

#[test]
#[serial]
fn test_malformed_config() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "testbed.toml", "[defaults\ninventory = ");
    let err = Config::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("testbed.toml"));
}

#[test]
#[serial]
fn test_malformed_yaml_and_json_config_name_the_file() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let yaml = write_config(&dir, "broken.yaml", "defaults: [unclosed
");
    let err = Config::load(Some(yaml.as_path())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("broken.yaml"));

    let json = write_config(&dir, "broken.json", "{\"defaults\": ");
    let err = Config::load(Some(json.as_path())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("broken.json"));
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var("TESTBED_INVENTORY", "/tmp/other.yaml");
    std::env::set_var("TESTBED_TARGET", "b.example.com");
    std::env::set_var("TESTBED_LOG_LEVEL", "trace");
    std::env::set_var("TESTBED_LOG_FORMAT", "JSON");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "testbed.toml", "[defaults]\ntarget = \"a\"\n");
    let config = Config::load(Some(path.as_path())).unwrap();
    clear_env();

    assert_eq!(config.inventory_path(), Some(Path::new("/tmp/other.yaml")));
    assert_eq!(config.selector(), Some("b.example.com"));
    assert_eq!(config.logging.level, LogLevel::Trace);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial]
fn test_invalid_env_value() {
    clear_env();
    std::env::set_var("TESTBED_LOG_LEVEL", "shouting");
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "testbed.toml", "");
    let result = Config::load(Some(path.as_path()));
    clear_env();

    assert!(matches!(
        result,
        Err(Error::InvalidConfig { ref key, .. }) if key == "logging.level"
    ));
}

#[test]
#[serial]
fn test_config_file_from_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "custom.toml", "[defaults]\ntarget = \"from-env\"\n");
    std::env::set_var("TESTBED_CONFIG", &path);
    let config = Config::load(None).unwrap();
    clear_env();

    assert_eq!(config.selector(), Some("from-env"));
}

#[test]
#[serial]
fn test_selector_feeds_resolver() {
    clear_env();
    let inv = fixture_inventory();

    let config = Config::default();
    assert_eq!(inv.resolve_targets(config.selector()).len(), 5);

    std::env::set_var("TESTBED_TARGET", "db1.example.com");
    let config = Config::load(None).unwrap();
    clear_env();
    assert_eq!(inv.resolve_targets(config.selector()), vec!["db1.example.com"]);
}

#[test]
#[serial]
fn test_load_inventory_from_config() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let (_inv_dir, inv_path) = write_inventory(
        "groups:\n  - name: g\n    targets:\n      - uri: only\n",
        "yaml",
    );
    let path = write_config(
        &dir,
        "testbed.toml",
        &format!("[defaults]\ninventory = {:?}\n", inv_path.display().to_string()),
    );

    let inv = Config::load(Some(path.as_path())).unwrap().load_inventory().unwrap();
    assert_eq!(inv.resolve_targets(None), vec!["only"]);
}

#[test]
#[serial]
fn test_load_inventory_missing_configured_path() {
    clear_env();
    std::env::set_var("TESTBED_INVENTORY", "/nonexistent/inventory.yaml");
    let config = Config::load(None).unwrap();
    clear_env();

    let err = config.load_inventory().unwrap_err();
    assert!(matches!(err, Error::InventoryNotFound(_)));
}
