//! Structural edits to the inventory.
//!
//! Edits keep the tree shape: targets are appended or removed in place and
//! feature tags are changed on exactly one node, the first match in
//! pre-order. Nodes are located by [`GroupPath`] first and then borrowed
//! mutably, so the read and write halves of an edit never overlap.

use tracing::debug;

use super::group::{Group, GroupPath};
use super::target::Target;
use super::Inventory;
use crate::error::{Error, Result};

/// Kind of node a feature edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureScope {
    /// Identifier is a group name (exact match)
    Group,
    /// Identifier is a target uri (case-insensitive)
    Target,
}

impl std::fmt::Display for FeatureScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureScope::Group => write!(f, "group"),
            FeatureScope::Target => write!(f, "target"),
        }
    }
}

impl std::str::FromStr for FeatureScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "group" => Ok(FeatureScope::Group),
            "target" | "host" => Ok(FeatureScope::Target),
            other => Err(Error::InvalidTarget(format!(
                "unknown feature scope '{}', expected 'group' or 'target'",
                other
            ))),
        }
    }
}

impl Inventory {
    /// The group at `path`, if the path is valid.
    pub fn group(&self, path: &GroupPath) -> Option<&Group> {
        let (first, rest) = path.indices().split_first()?;
        rest.iter()
            .try_fold(self.groups.get(*first)?, |group, index| group.groups.get(*index))
    }

    /// Mutable access to the group at `path`, if the path is valid.
    pub fn group_mut(&mut self, path: &GroupPath) -> Option<&mut Group> {
        let (first, rest) = path.indices().split_first()?;
        rest.iter().try_fold(self.groups.get_mut(*first)?, |group, index| {
            group.groups.get_mut(*index)
        })
    }

    /// Append `target` to the first group named `group_name` (pre-order).
    ///
    /// When no such group exists a new top-level group holding just this
    /// target is appended. No de-duplication against existing uris.
    pub fn add_target(&mut self, group_name: &str, target: Target) -> Result<()> {
        if group_name.is_empty() {
            return Err(Error::InvalidTarget(format!(
                "cannot add '{}' to a group without a name",
                target.uri
            )));
        }
        if target.uri.is_empty() {
            return Err(Error::InvalidTarget(format!(
                "cannot add a target without a uri to group '{}'",
                group_name
            )));
        }

        debug!(group = group_name, uri = %target.uri, "adding target");
        match self.locate_group(group_name).and_then(|path| self.group_mut(&path)) {
            Some(group) => group.add_target(target),
            None => {
                let mut group = Group::new(group_name);
                group.add_target(target);
                self.groups.push(group);
            }
        }
        Ok(())
    }

    /// Remove every target whose uri equals `uri` exactly, in every group.
    ///
    /// Returns how many were removed; zero is not an error.
    pub fn remove_target(&mut self, uri: &str) -> usize {
        let removed = remove_from(&mut self.groups, uri);
        debug!(uri, removed, "removed target");
        removed
    }

    /// Tag the first matching group or target with `feature`.
    ///
    /// `features` is materialized if absent. Returns `true` if the tag was
    /// added, `false` if it was already present or nothing matched.
    pub fn add_feature(&mut self, scope: FeatureScope, feature: &str, identifier: &str) -> bool {
        let Some(features) = self.locate_features(scope, identifier) else {
            debug!(%scope, identifier, "no node to tag");
            return false;
        };

        let features = features.get_or_insert_with(Vec::new);
        if features.iter().any(|f| f == feature) {
            return false;
        }
        features.push(feature.to_string());
        debug!(%scope, identifier, feature, "added feature");
        true
    }

    /// Drop every occurrence of `feature` from the first matching group or
    /// target.
    ///
    /// A missing node or a node without `features` is left untouched.
    /// Returns `true` if anything was removed.
    pub fn remove_feature(&mut self, scope: FeatureScope, feature: &str, identifier: &str) -> bool {
        let Some(Some(features)) = self.locate_features(scope, identifier) else {
            return false;
        };

        let before = features.len();
        features.retain(|f| f != feature);
        let removed = before != features.len();
        if removed {
            debug!(%scope, identifier, feature, "removed feature");
        }
        removed
    }

    fn locate_group(&self, name: &str) -> Option<GroupPath> {
        self.group_paths()
            .find(|(_, group)| group.name == name)
            .map(|(path, _)| path)
    }

    fn locate_target(&self, uri: &str) -> Option<(GroupPath, usize)> {
        self.group_paths().find_map(|(path, group)| {
            group
                .targets
                .iter()
                .position(|t| t.matches_uri(uri))
                .map(|index| (path, index))
        })
    }

    fn locate_features(
        &mut self,
        scope: FeatureScope,
        identifier: &str,
    ) -> Option<&mut Option<Vec<String>>> {
        match scope {
            FeatureScope::Group => {
                let path = self.locate_group(identifier)?;
                self.group_mut(&path).map(|group| &mut group.features)
            }
            FeatureScope::Target => {
                let (path, index) = self.locate_target(identifier)?;
                self.group_mut(&path)
                    .and_then(|group| group.targets.get_mut(index))
                    .map(|target| &mut target.features)
            }
        }
    }
}

fn remove_from(groups: &mut [Group], uri: &str) -> usize {
    groups
        .iter_mut()
        .map(|group| {
            let before = group.targets.len();
            group.targets.retain(|t| t.uri != uri);
            before - group.targets.len() + remove_from(&mut group.groups, uri)
        })
        .sum()
}
