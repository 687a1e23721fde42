//! # Testbed - An Inventory of Test Targets
//!
//! Testbed holds the machines and containers an acceptance test suite runs
//! against, and answers the questions a test harness keeps asking: which
//! targets does this selector mean, and how do I connect to this one?
//!
//! ## Core Concepts
//!
//! - **Inventory**: an ordered forest of groups, loaded whole from YAML
//! - **Group**: a named container of targets and nested subgroups
//! - **Target**: one endpoint, with connection config, facts, vars and features
//! - **Role**: a tag in a target's `vars.role` / `vars.roles`
//! - **Feature**: a capability tag on a group or target
//! - **Selector**: a group name, target uri or role, or nothing for "all"
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Test harness / remote command runner                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                 │ selector                     │ uri
//!                 ▼                              ▼
//! ┌───────────────────────────────┐   ┌─────────────────────────────────┐
//! │           Resolver            │   │            Mutator              │
//! │ (groups, uris, roles)         │   │ (targets, features, persist)    │
//! └───────────────────────────────┘   └─────────────────────────────────┘
//!                 │                              │
//!                 └──────────────┬───────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Traversal Engine                              │
//! │                (pre-order walks, caller visitors)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Inventory Model (YAML / JSON)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use testbed::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = Config::load(None)?;
//!     let mut inventory = config.load_inventory()?;
//!
//!     for uri in inventory.find_selector(["agent"])? {
//!         let transport = inventory.target(&uri).and_then(|t| t.transport());
//!         println!("{} via {:?}", uri, transport);
//!     }
//!
//!     inventory.add_feature(FeatureScope::Target, "puppet-agent", "a.example.com");
//!     inventory.save("inventory.yaml")?;
//!     Ok(())
//! }
//! ```

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::config::{Config, LogFormat, LogLevel};
    pub use crate::error::{Error, ErrorContext, ErrorKind, Result};
    pub use crate::inventory::{
        FeatureScope, Group, GroupBuilder, GroupPath, GroupVisitor, Inventory, SelectorMatch,
        Target, TargetVisitor, Vars, Visit,
    };
    pub use crate::logging::LoggingBuilder;
}

// ============================================================================
// Error Handling
// ============================================================================

/// Error types and the crate `Result` alias.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Inventory
// ============================================================================

/// Groups, targets, traversal, resolution and structural edits.
pub mod inventory;

// ============================================================================
// Configuration and Logging
// ============================================================================

/// Layered configuration: defaults, files, environment.
pub mod config;

/// Global tracing subscriber setup.
pub mod logging;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of Testbed.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
