//! Group definition for the Testbed inventory.
//!
//! A `Group` is a named container holding targets and nested subgroups, in
//! stored order. Names are not unique; lookups take the first group in
//! pre-order, so positions matter and are addressed with [`GroupPath`].

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::target::{Target, Vars};

/// A group of targets in the inventory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    /// Group name
    pub name: String,

    /// Targets directly in this group
    #[serde(default, deserialize_with = "null_as_default")]
    pub targets: Vec<Target>,

    /// Nested subgroups
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub groups: Vec<Group>,

    /// Capability tags; `None` until first touched by a feature edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Keys not interpreted here (group-level config, facts, vars)
    #[serde(flatten)]
    pub extra: Vars,
}

impl Group {
    /// Create a new empty group with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a target
    pub fn add_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// Append a subgroup
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Check if a target with this uri is a direct member (ignoring case)
    pub fn has_target(&self, uri: &str) -> bool {
        self.targets.iter().any(|t| t.matches_uri(uri))
    }

    /// Feature tags, empty when the field is absent
    pub fn features(&self) -> &[String] {
        self.features.as_deref().unwrap_or_default()
    }

    /// Check whether this group carries a feature tag
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features().iter().any(|f| f == feature)
    }

    /// Check if this group is empty (no targets and no subgroups)
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.groups.is_empty()
    }

    /// Get the number of direct targets
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Get the number of direct subgroups
    pub fn child_count(&self) -> usize {
        self.groups.len()
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} targets", self.name, self.targets.len())?;
        if !self.groups.is_empty() {
            write!(f, ", {} subgroups", self.groups.len())?;
        }
        write!(f, ")")?;
        if !self.features().is_empty() {
            write!(f, " [{}]", self.features().join(", "))?;
        }
        Ok(())
    }
}

/// Builder for creating groups with a fluent API
#[derive(Debug, Default)]
pub struct GroupBuilder {
    name: String,
    targets: Vec<Target>,
    groups: Vec<Group>,
    features: Option<Vec<String>>,
}

impl GroupBuilder {
    /// Create a new group builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a target to the group
    pub fn target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Add bare targets by uri
    pub fn uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(uris.into_iter().map(Target::new));
        self
    }

    /// Add a subgroup
    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Add a feature tag
    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        let feature = feature.into();
        let features = self.features.get_or_insert_with(Vec::new);
        if !features.contains(&feature) {
            features.push(feature);
        }
        self
    }

    /// Build the group
    pub fn build(self) -> Group {
        Group {
            name: self.name,
            targets: self.targets,
            groups: self.groups,
            features: self.features,
            extra: Vars::new(),
        }
    }
}

/// Position of a group in the forest: one index per level, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPath(Vec<usize>);

impl GroupPath {
    /// Path to the `index`-th root group
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path to the `index`-th subgroup of this group
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Indices from the root down
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; root groups are at depth 0
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}
