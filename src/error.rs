//! Error types for Testbed.
//!
//! Every failure surfaced by the inventory core carries the identifier that
//! caused it (selector, uri or path), so a failed lookup can be diagnosed from
//! the message alone.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Testbed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A selector, target, group, role or path could not be resolved.
    NotFound,
    /// A name resolved in more than one namespace where only one was allowed.
    AmbiguousInput,
    /// Reading or writing the persisted inventory failed.
    Io,
    /// The caller handed in something malformed.
    InvalidInput,
    /// Configuration or logging setup failed.
    Config,
}

/// The main error type for Testbed.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// No target with this uri exists in the inventory.
    #[error("Target '{0}' not found in inventory")]
    TargetNotFound(String),

    /// A selector matched no group, target or role.
    #[error("Unable to find group, target or role '{0}' in inventory")]
    SelectorNotFound(String),

    /// A name matched more than one namespace.
    #[error("Selector '{name}' is ambiguous: it matches {namespaces}")]
    AmbiguousInput {
        /// The selector as supplied
        name: String,
        /// Human readable list of namespaces hit
        namespaces: String,
    },

    // ========================================================================
    // Mutation Errors
    // ========================================================================
    /// A target or group could not be added.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// The inventory file does not exist.
    #[error("Inventory file not found: {0}")]
    InventoryNotFound(PathBuf),

    /// The inventory file exists but could not be parsed.
    #[error("Failed to load inventory from '{path}': {message}")]
    InventoryLoad {
        /// Path to inventory
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The inventory file exists but could not be read.
    #[error("Failed to read inventory from '{path}': {source}")]
    InventoryRead {
        /// Source path
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The inventory could not be written back.
    #[error("Failed to write inventory to '{path}': {source}")]
    InventoryWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// Generic error with source.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new inventory load error.
    pub fn inventory_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InventoryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new ambiguous input error.
    pub fn ambiguous(name: impl Into<String>, namespaces: &[&str]) -> Self {
        Self::AmbiguousInput {
            name: name.into(),
            namespaces: namespaces.join(", "),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TargetNotFound(_) | Error::SelectorNotFound(_) | Error::InventoryNotFound(_) => {
                ErrorKind::NotFound
            }
            Error::AmbiguousInput { .. } => ErrorKind::AmbiguousInput,
            Error::InvalidTarget(_) => ErrorKind::InvalidInput,
            Error::InventoryLoad { .. }
            | Error::InventoryRead { .. }
            | Error::InventoryWrite { .. }
            | Error::Io(_)
            | Error::YamlParse(_)
            | Error::JsonParse(_) => ErrorKind::Io,
            Error::Config(_) | Error::InvalidConfig { .. } => ErrorKind::Config,
            Error::Other { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Returns true if this error means something could not be found.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 5,
            ErrorKind::AmbiguousInput => 6,
            ErrorKind::Io => 4,
            ErrorKind::Config => 3,
            ErrorKind::InvalidInput => 1,
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Adds context with a closure that is only evaluated on error.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Other {
            message: message.into(),
            source: Some(Box::new(e)),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::Other {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}
