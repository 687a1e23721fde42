//! Shared test utilities and fixtures for the Testbed test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use testbed::inventory::{GroupBuilder, Inventory, Target};

/// Path to a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The checked-in fixture inventory
pub fn fixture_inventory() -> Inventory {
    Inventory::load(fixture_path("inventory.yaml")).unwrap()
}

/// Two groups, one target each: `ssh_nodes` holds `a.example.com` with
/// `role: agent`, `winrm_nodes` holds `b.example.com` with
/// `roles: [agent, iis]`.
pub fn two_node_inventory() -> Inventory {
    Inventory::with_groups(vec![
        GroupBuilder::new("ssh_nodes")
            .target(
                Target::new("a.example.com")
                    .with_config("transport", "ssh")
                    .with_var("role", "agent"),
            )
            .build(),
        GroupBuilder::new("winrm_nodes")
            .target(
                Target::new("b.example.com")
                    .with_config("transport", "winrm")
                    .with_var(
                        "roles",
                        serde_yaml::Value::Sequence(vec!["agent".into(), "iis".into()]),
                    ),
            )
            .build(),
    ])
}

/// Write `content` to `inventory.<extension>` in a fresh temp dir.
///
/// The returned `TempDir` must be kept alive while the file is used.
pub fn write_inventory(content: &str, extension: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("inventory.{}", extension));
    fs::write(&path, content).unwrap();
    (dir, path)
}

/// Write `content` to a temp file and load it back
pub fn load_inventory_from_string(content: &str, extension: &str) -> Inventory {
    let (_dir, path) = write_inventory(content, extension);
    Inventory::load(&path).unwrap()
}
