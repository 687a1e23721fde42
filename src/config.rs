//! Configuration module for Testbed
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - User configuration (~/.testbed/config.toml)
//! - Project configuration (./testbed.toml)
//! - A file named by `TESTBED_CONFIG`
//! - Environment variables
//!
//! The inventory core never reads the environment itself. Values such as
//! the current target are read here once and handed to inventory calls as
//! explicit arguments.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::inventory::Inventory;

/// Environment variable naming an extra config file
pub const CONFIG_ENV: &str = "TESTBED_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings
    pub defaults: Defaults,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Inventory file; when set it must exist
    pub inventory: Option<PathBuf>,

    /// Target to operate against when the caller names none
    pub target: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// Include the event target (module path)
    pub with_target: bool,

    /// Colored output
    pub ansi_colors: bool,

    /// Filter directive, used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            with_target: false,
            ansi_colors: true,
            filter: None,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Convert from verbosity level (0-3+).
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(Error::InvalidConfig {
                key: "logging.level".to_string(),
                message: format!("unknown log level '{}'", s),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty console output with colors
    Pretty,
    /// Compact single-line output
    #[default]
    Compact,
    /// JSON structured output
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::InvalidConfig {
                key: "logging.format".to_string(),
                message: format!("unknown log format '{}'", s),
            }),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// An explicit path must exist and is the only file read. Otherwise every
    /// standard location that exists is merged, later files winning.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge_from_file(&path)?;
            }
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from a single file, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Config::default().merge_from_file(path.as_ref())
    }

    /// Get the list of configuration file paths to check, lowest precedence first
    fn get_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit_path {
            return vec![path.to_path_buf()];
        }

        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".testbed").join("config.toml"));
        }

        paths.push(PathBuf::from("testbed.toml"));

        if let Ok(env_config) = std::env::var(CONFIG_ENV) {
            paths.push(PathBuf::from(env_config));
        }

        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let parsed: std::result::Result<Config, String> = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => toml::from_str(&content).map_err(|e| e.to_string()),
        };
        let file_config = parsed.map_err(|e| {
            Error::Config(format!("failed to parse config file {}: {}", path.display(), e))
        })?;

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one; `other` wins where it is set
    fn merge(&self, other: Config) -> Config {
        let defaults = LoggingConfig::default();
        Config {
            defaults: Defaults {
                inventory: other
                    .defaults
                    .inventory
                    .or_else(|| self.defaults.inventory.clone()),
                target: other
                    .defaults
                    .target
                    .or_else(|| self.defaults.target.clone()),
            },
            logging: LoggingConfig {
                level: if other.logging.level != defaults.level {
                    other.logging.level
                } else {
                    self.logging.level
                },
                format: if other.logging.format != defaults.format {
                    other.logging.format
                } else {
                    self.logging.format
                },
                with_target: other.logging.with_target || self.logging.with_target,
                ansi_colors: other.logging.ansi_colors && self.logging.ansi_colors,
                filter: other
                    .logging
                    .filter
                    .or_else(|| self.logging.filter.clone()),
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // TESTBED_INVENTORY
        if let Ok(path) = std::env::var("TESTBED_INVENTORY") {
            self.defaults.inventory = Some(PathBuf::from(path));
        }

        // TESTBED_TARGET
        if let Ok(target) = std::env::var("TESTBED_TARGET") {
            self.defaults.target = Some(target).filter(|t| !t.is_empty());
        }

        // TESTBED_LOG_LEVEL
        if let Ok(level) = std::env::var("TESTBED_LOG_LEVEL") {
            self.logging.level = level.parse()?;
        }

        // TESTBED_LOG_FORMAT
        if let Ok(format) = std::env::var("TESTBED_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        // NO_COLOR
        if std::env::var("NO_COLOR").is_ok() {
            self.logging.ansi_colors = false;
        }

        Ok(())
    }

    /// Get the configured inventory path
    pub fn inventory_path(&self) -> Option<&Path> {
        self.defaults.inventory.as_deref()
    }

    /// The selector to resolve when the caller supplies none: the configured
    /// current target, or `None` for every target.
    pub fn selector(&self) -> Option<&str> {
        self.defaults.target.as_deref()
    }

    /// Load the inventory this configuration points at.
    ///
    /// A configured path that does not exist is an error. With no path the
    /// default location is tried and the local inventory used if absent.
    pub fn load_inventory(&self) -> Result<Inventory> {
        Inventory::load_or_local(self.inventory_path())
    }
}
