//! Inventory management for Testbed.
//!
//! This module provides the target inventory:
//! - The group/target forest and its persisted YAML (or JSON) form
//! - Pre-order traversal with caller-supplied visitors
//! - Resolution of selectors across groups, target uris and roles
//! - Structural edits (targets, feature tags) that keep the tree shape
//!
//! An inventory is loaded whole, used for one invocation, optionally edited
//! in place and written back whole. Nothing is cached between loads.

pub mod group;
pub mod mutate;
pub mod resolve;
pub mod target;
pub mod traverse;

pub use group::{Group, GroupBuilder, GroupPath};
pub use mutate::FeatureScope;
pub use resolve::SelectorMatch;
pub use target::{Target, Vars};
pub use traverse::{GroupVisitor, Groups, LowercaseName, LowercaseUri, TargetVisitor, Visit};

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Uri of the single target in [`Inventory::local`].
pub const LOCAL_TARGET: &str = "testbed_localhost";

/// Name of the single group in [`Inventory::local`].
pub const LOCAL_GROUP: &str = "local";

/// Where an inventory is looked for when no path is given.
pub const DEFAULT_INVENTORY_PATH: &str = "tests/fixtures/inventory.yaml";

/// The root of the inventory: an ordered forest of groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Top-level groups
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,

    /// Top-level keys not interpreted here (e.g. `version`, `config`)
    #[serde(flatten)]
    pub extra: Vars,
}

impl Inventory {
    /// Create a new empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inventory from top-level groups
    pub fn with_groups(groups: Vec<Group>) -> Self {
        Self {
            groups,
            extra: Vars::new(),
        }
    }

    /// The inventory used when none is available: one group holding the
    /// local machine over the `local` transport.
    pub fn local() -> Self {
        let target = Target::new(LOCAL_TARGET).with_config("transport", "local");
        Self::with_groups(vec![GroupBuilder::new(LOCAL_GROUP).target(target).build()])
    }

    /// Load an inventory file. YAML unless the extension is `.json`.
    ///
    /// Fails with [`Error::InventoryNotFound`] if the path does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InventoryNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::InventoryRead {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };
        let inventory = parsed.map_err(|e| Error::inventory_load(path, e.to_string()))?;

        debug!(
            path = %path.display(),
            groups = inventory.group_count(),
            targets = inventory.target_count(),
            "loaded inventory"
        );
        Ok(inventory)
    }

    /// Load from `path` if given; otherwise from [`DEFAULT_INVENTORY_PATH`]
    /// when it exists, falling back to [`Inventory::local`].
    ///
    /// A given path that does not exist is an error.
    pub fn load_or_local(path: Option<&Path>) -> Result<Self> {
        Self::load_or_local_in(path, Path::new(DEFAULT_INVENTORY_PATH))
    }

    /// Like [`Inventory::load_or_local`], with `default` in place of
    /// [`DEFAULT_INVENTORY_PATH`].
    pub fn load_or_local_in(path: Option<&Path>, default: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        if default.exists() {
            Self::load(default)
        } else {
            warn!(
                path = %default.display(),
                "no inventory file, using the local target only"
            );
            Ok(Self::local())
        }
    }

    /// Parse the YAML persisted form. An empty document is an empty inventory.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse from raw bytes of the YAML persisted form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes).map_err(|e| Error::Other {
            message: format!("inventory is not valid UTF-8: {}", e),
            source: Some(Box::new(e)),
        })?;
        Self::from_yaml(content)
    }

    /// Parse the JSON persisted form.
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Render the YAML persisted form.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render the JSON persisted form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the whole inventory to `path`, replacing its contents.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let rendered = if is_json(path) {
            self.to_json()?
        } else {
            self.to_yaml()?
        };

        std::fs::write(path, rendered).map_err(|source| Error::InventoryWrite {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            groups = self.group_count(),
            targets = self.target_count(),
            "wrote inventory"
        );
        Ok(())
    }

    /// Count groups at every depth
    pub fn group_count(&self) -> usize {
        self.iter_groups().count()
    }

    /// Count targets at every depth, duplicates included
    pub fn target_count(&self) -> usize {
        self.iter_targets().count()
    }

    /// Check whether the inventory holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Treat an explicit `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl std::fmt::Display for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Inventory ({} targets, {} groups)",
            self.target_count(),
            self.group_count()
        )?;

        for (path, group) in self.group_paths() {
            let indent = "  ".repeat(path.depth() + 1);
            writeln!(f, "{}[{}]", indent, group)?;
            for target in &group.targets {
                writeln!(f, "{}  {}", indent, target)?;
            }
        }

        Ok(())
    }
}
