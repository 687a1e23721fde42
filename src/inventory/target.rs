//! Target definition for the Testbed inventory.
//!
//! A `Target` is one addressable machine or container that tests run against.
//! Besides its `uri` it carries a small key/value store: transport settings
//! (`config`), discovered attributes (`facts`), free-form `vars` and a set of
//! capability tags (`features`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Ordered string-keyed mapping used for config, facts and vars.
pub type Vars = IndexMap<String, serde_yaml::Value>;

/// A test target in the inventory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    /// Identifier used in every lookup (stored case-preserving)
    pub uri: String,

    /// Transport/connection settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Vars>,

    /// Discovered attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vars>,

    /// Free-form variables, including `role`/`roles`
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub vars: Vars,

    /// Capability tags; `None` until first touched by a feature edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Keys not interpreted here (e.g. `name`, `alias`), kept for rewrite
    #[serde(flatten)]
    pub extra: Vars,
}

impl Target {
    /// Create a new target with the given uri
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Set a config entry, materializing `config` if absent
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.config
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set a fact, materializing `facts` if absent
    pub fn with_fact(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.facts
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set a variable
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Add a feature tag (no duplicates)
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        let feature = feature.into();
        let features = self.features.get_or_insert_with(Vec::new);
        if !features.contains(&feature) {
            features.push(feature);
        }
        self
    }

    /// Check whether `uri` names this target, ignoring case
    pub fn matches_uri(&self, uri: &str) -> bool {
        self.uri.to_lowercase() == uri.to_lowercase()
    }

    /// Feature tags, empty when the field is absent
    pub fn features(&self) -> &[String] {
        self.features.as_deref().unwrap_or_default()
    }

    /// Check whether this target carries a feature tag
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features().iter().any(|f| f == feature)
    }

    /// The `transport` entry of `config`, if it is a string
    pub fn transport(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.get("transport"))
            .and_then(serde_yaml::Value::as_str)
    }

    /// Declared roles, lower-cased.
    ///
    /// `vars.role` wins over `vars.roles` when both are set to something
    /// other than null. A scalar counts as a one-element list; entries that
    /// are not scalars are ignored.
    pub fn roles(&self) -> Vec<String> {
        let declared = ["role", "roles"]
            .iter()
            .filter_map(|key| self.vars.get(*key))
            .find(|value| !value.is_null());

        match declared {
            Some(serde_yaml::Value::Sequence(items)) => items
                .iter()
                .filter_map(scalar_to_string)
                .map(|s| s.to_lowercase())
                .collect(),
            Some(value) => scalar_to_string(value)
                .map(|s| vec![s.to_lowercase()])
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Check whether this target declares `role` (compared lower-cased)
    pub fn has_role(&self, role: &str) -> bool {
        let role = role.to_lowercase();
        self.roles().iter().any(|r| *r == role)
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)?;
        if let Some(transport) = self.transport() {
            write!(f, " ({})", transport)?;
        }
        if !self.features().is_empty() {
            write!(f, " [{}]", self.features().join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_new() {
        let target = Target::new("web1.example.com");
        assert_eq!(target.uri, "web1.example.com");
        assert!(target.config.is_none());
        assert!(target.facts.is_none());
        assert!(target.vars.is_empty());
        assert!(target.features.is_none());
        assert!(target.features().is_empty());
    }

    #[test]
    fn test_matches_uri_ignores_case() {
        let target = Target::new("Web1.Example.com");
        assert!(target.matches_uri("web1.example.com"));
        assert!(target.matches_uri("WEB1.EXAMPLE.COM"));
        assert!(!target.matches_uri("web2.example.com"));
    }

    #[test]
    fn test_transport() {
        let target = Target::new("localhost").with_config("transport", "local");
        assert_eq!(target.transport(), Some("local"));
        assert_eq!(Target::new("x").transport(), None);
    }

    #[test]
    fn test_with_feature_is_a_set() {
        let target = Target::new("a")
            .with_feature("puppet-agent")
            .with_feature("puppet-agent")
            .with_feature("docker");
        assert_eq!(target.features(), ["puppet-agent", "docker"]);
        assert!(target.has_feature("docker"));
    }

    #[test]
    fn test_roles_scalar_and_sequence() {
        let target = Target::new("a").with_var("role", "Agent");
        assert_eq!(target.roles(), vec!["agent"]);

        let roles = serde_yaml::Value::Sequence(vec!["Agent".into(), "IIS".into()]);
        let target = Target::new("b").with_var("roles", roles);
        assert_eq!(target.roles(), vec!["agent", "iis"]);
        assert!(target.has_role("iis"));
        assert!(target.has_role("AGENT"));
    }

    #[test]
    fn test_role_takes_precedence_over_roles() {
        let roles = serde_yaml::Value::Sequence(vec!["db".into()]);
        let target = Target::new("a").with_var("roles", roles).with_var("role", "web");
        assert_eq!(target.roles(), vec!["web"]);
    }

    #[test]
    fn test_null_role_falls_back_to_roles() {
        let roles = serde_yaml::Value::Sequence(vec!["db".into()]);
        let target = Target::new("a")
            .with_var("role", serde_yaml::Value::Null)
            .with_var("roles", roles);
        assert_eq!(target.roles(), vec!["db"]);
    }

    #[test]
    fn test_no_roles() {
        assert!(Target::new("a").roles().is_empty());
        let target = Target::new("a").with_var("role", serde_yaml::Value::Mapping(Default::default()));
        assert!(target.roles().is_empty());
    }

    #[test]
    fn test_deserialize_keeps_unknown_keys() {
        let target: Target = serde_yaml::from_str(
            r#"
uri: 10.0.0.5
name: db1
alias: [database]
config:
  transport: ssh
vars:
"#,
        )
        .unwrap();

        assert_eq!(target.uri, "10.0.0.5");
        assert_eq!(target.transport(), Some("ssh"));
        assert!(target.vars.is_empty());
        assert_eq!(target.extra.get("name"), Some(&"db1".into()));
        assert!(target.extra.contains_key("alias"));
    }

    #[test]
    fn test_display() {
        let target = Target::new("a.example.com")
            .with_config("transport", "ssh")
            .with_feature("puppet-agent");
        assert_eq!(target.to_string(), "a.example.com (ssh) [puppet-agent]");
    }
}
