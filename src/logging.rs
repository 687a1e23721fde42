//! Structured logging setup using the tracing crate.
//!
//! Library code only emits events; a binary or test harness that wants to
//! see them installs a global subscriber once through [`LoggingBuilder`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use crate::error::{Error, Result};

/// Builder for the global logging subscriber.
#[derive(Debug, Clone, Default)]
pub struct LoggingBuilder {
    config: LoggingConfig,
}

impl LoggingBuilder {
    /// Create a new logging builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an existing configuration.
    pub fn from_config(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Set the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set ANSI colors.
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.config.ansi_colors = enabled;
        self
    }

    /// Include target in logs.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.config.with_target = enabled;
        self
    }

    /// Set filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.filter = Some(filter.into());
        self
    }

    /// Install the global subscriber.
    ///
    /// Fails with [`Error::Config`] if one is already installed.
    pub fn init(self) -> Result<()> {
        let env_filter = self.build_filter();
        let fmt = tracing_subscriber::fmt::layer()
            .with_ansi(self.config.ansi_colors)
            .with_target(self.config.with_target);

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = match self.config.format {
            LogFormat::Pretty => registry.with(fmt.pretty()).try_init(),
            LogFormat::Compact => registry.with(fmt.compact()).try_init(),
            LogFormat::Json => registry.with(fmt.json()).try_init(),
        };

        installed.map_err(|e| Error::Config(e.to_string()))
    }

    /// `RUST_LOG` if set, else the configured filter, else the level.
    fn build_filter(&self) -> EnvFilter {
        let level = self.config.level.to_string();

        if let Some(ref filter) = self.config.filter {
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new(level))
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
        }
    }
}

/// Initialize logging from a verbosity count (`-v`, `-vv`, ...).
pub fn init_from_verbosity(verbosity: u8) -> Result<()> {
    LoggingBuilder::new()
        .with_level(LogLevel::from_verbosity(verbosity))
        .with_target(verbosity >= 2)
        .init()
}
