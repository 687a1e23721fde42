//! Selector resolution over the inventory.
//!
//! A name given by a caller may be a group name, a target uri or a role
//! declared in target vars. The three namespaces overlap and nothing stops a
//! name from hitting several of them; [`Inventory::find_selector`] reports
//! every hit, in order, without de-duplicating.

use std::borrow::Cow;
use tracing::trace;

use super::target::{Target, Vars};
use super::traverse::{Groups, LowercaseName, LowercaseUri, Visit};
use super::Inventory;
use crate::error::{Error, Result};

/// Which namespaces a single selector name hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMatch {
    /// The name as supplied
    pub name: String,
    /// Matches a group name
    pub group: bool,
    /// Matches a target uri
    pub target: bool,
    /// Uris of targets declaring the name as a role
    pub role_targets: Vec<String>,
}

impl SelectorMatch {
    /// Names of the namespaces hit, in resolution order.
    pub fn namespaces(&self) -> Vec<&'static str> {
        let mut hit = Vec::new();
        if self.group {
            hit.push("group");
        }
        if self.target {
            hit.push("target");
        }
        if !self.role_targets.is_empty() {
            hit.push("role");
        }
        hit
    }

    /// True when more than one namespace was hit.
    pub fn is_ambiguous(&self) -> bool {
        self.namespaces().len() > 1
    }

    /// True when nothing was hit.
    pub fn is_empty(&self) -> bool {
        self.namespaces().is_empty()
    }
}

impl Inventory {
    /// Resolve a selector to target uris.
    ///
    /// With no selector every target uri is returned as stored, in traversal
    /// order, duplicates included. A selector is returned as given; it is
    /// not checked against the inventory (see [`Inventory::target_exists`]).
    pub fn resolve_targets(&self, selector: Option<&str>) -> Vec<String> {
        match selector {
            Some(selector) => vec![selector.to_string()],
            None => self.iter_targets().map(|t| t.uri.clone()).collect(),
        }
    }

    /// Check whether some target's stored uri equals `uri` exactly.
    ///
    /// Unlike the other lookups this is case-sensitive.
    pub fn target_exists(&self, uri: &str) -> bool {
        self.resolve_targets(None).iter().any(|u| u == uri)
    }

    /// Every group name, lower-cased, pre-order, duplicates included.
    pub fn group_names(&self) -> Vec<String> {
        // LowercaseName cannot fail
        self.walk_groups(&mut LowercaseName).unwrap_or_default()
    }

    /// Every target uri, lower-cased, in traversal order.
    pub fn target_uris(&self) -> Vec<String> {
        // LowercaseUri cannot fail
        self.walk_targets(&mut LowercaseUri).unwrap_or_default()
    }

    /// Uris of the targets declaring `role` in `vars.role` or `vars.roles`.
    ///
    /// Returns `None`, not an empty list, when no target declares it.
    pub fn targets_with_role(&self, role: &str) -> Option<Vec<String>> {
        let role = role.to_lowercase();
        let uris = self
            .walk_targets(&mut |target: &Target| -> Result<Visit<String>> {
                Ok(target.has_role(&role).then(|| target.uri.clone()).into())
            })
            .unwrap_or_default();

        if uris.is_empty() {
            None
        } else {
            Some(uris)
        }
    }

    /// Report which namespaces `name` hits.
    pub fn explain_selector(&self, name: &str) -> SelectorMatch {
        let needle = name.to_lowercase();
        SelectorMatch {
            name: name.to_string(),
            group: self.group_names().contains(&needle),
            target: self.target_uris().contains(&needle),
            role_targets: self.targets_with_role(&needle).unwrap_or_default(),
        }
    }

    /// Resolve selector names across groups, target uris and roles.
    ///
    /// For each name, in order: the name itself if it is a group, the name
    /// itself if it is a target uri, then the uri of every target holding it
    /// as a role. Names compare case-insensitively but are returned as given.
    /// Results are never de-duplicated.
    ///
    /// Fails with [`Error::SelectorNotFound`] when nothing matched, including
    /// when no names were given.
    pub fn find_selector<I, S>(&self, selectors: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = self.group_names();
        let targets = self.target_uris();

        let mut requested = Vec::new();
        let mut found = Vec::new();

        for selector in selectors {
            let name = selector.as_ref();
            let needle = name.to_lowercase();
            requested.push(name.to_string());

            if groups.contains(&needle) {
                trace!(selector = name, "matched group");
                found.push(name.to_string());
            }
            if targets.contains(&needle) {
                trace!(selector = name, "matched target");
                found.push(name.to_string());
            }
            if let Some(uris) = self.targets_with_role(&needle) {
                trace!(selector = name, count = uris.len(), "matched role");
                found.extend(uris);
            }
        }

        if found.is_empty() {
            let shown = if requested.is_empty() {
                "<empty selector>".to_string()
            } else {
                requested.join(", ")
            };
            return Err(Error::SelectorNotFound(shown));
        }

        Ok(found)
    }

    /// Like [`Inventory::find_selector`], but a name hitting more than one
    /// namespace fails with [`Error::AmbiguousInput`].
    pub fn find_selector_strict<I, S>(&self, selectors: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = selectors
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();

        for name in &names {
            let hit = self.explain_selector(name);
            if hit.is_ambiguous() {
                return Err(Error::ambiguous(name.as_str(), &hit.namespaces()));
            }
        }

        self.find_selector(&names)
    }

    /// The first target whose uri matches, ignoring case.
    pub fn target(&self, uri: &str) -> Option<&Target> {
        self.iter_targets().find(|t| t.matches_uri(uri))
    }

    /// Connection config of the first target matching `uri`.
    ///
    /// `Ok(None)` if the target has no config; [`Error::TargetNotFound`] if
    /// no target matches.
    pub fn config_of(&self, uri: &str) -> Result<Option<&Vars>> {
        self.target(uri)
            .map(|t| t.config.as_ref())
            .ok_or_else(|| Error::TargetNotFound(uri.to_string()))
    }

    /// Facts of the first target matching `uri`.
    ///
    /// `Ok(None)` if the target has no facts; [`Error::TargetNotFound`] if
    /// no target matches.
    pub fn facts_of(&self, uri: &str) -> Result<Option<&Vars>> {
        self.target(uri)
            .map(|t| t.facts.as_ref())
            .ok_or_else(|| Error::TargetNotFound(uri.to_string()))
    }

    /// Vars of the first target matching `uri`; empty if none matches.
    pub fn vars_of(&self, uri: &str) -> Cow<'_, Vars> {
        match self.target(uri) {
            Some(target) => Cow::Borrowed(&target.vars),
            None => Cow::Owned(Vars::new()),
        }
    }

    /// Check whether the first group named `group` (pre-order), or any
    /// group beneath it, holds a target matching `uri`.
    pub fn target_in_group(&self, uri: &str, group: &str) -> bool {
        self.iter_groups()
            .find(|g| g.name == group)
            .is_some_and(|g| {
                Groups::new(std::slice::from_ref(g))
                    .any(|(_, g)| g.targets.iter().any(|t| t.matches_uri(uri)))
            })
    }

    /// Uris of every target under the first group named `group`, its
    /// subgroups included, in traversal order. Empty if no such group.
    pub fn targets_in_group(&self, group: &str) -> Vec<String> {
        self.iter_groups()
            .find(|g| g.name == group)
            .map(|g| {
                Groups::new(std::slice::from_ref(g))
                    .flat_map(|(_, g)| g.targets.iter())
                    .map(|t| t.uri.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
