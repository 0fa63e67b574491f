//! Structured logging setup
//!
//! Events go to stderr so that report output on stdout stays parseable.
//! `RUST_LOG` overrides every preset.

use std::io;

use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Enable JSON structured logging (vs plain text)
    pub json_format: bool,
    /// Enable pretty printing for development
    pub pretty_print: bool,
    /// Include file and line number information
    pub include_location: bool,
    /// Environment filter (supports per-crate directives like "nplus1_orm=debug")
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: false,
            include_location: false,
            env_filter: None,
        }
    }
}

fn crate_filter(level: &str) -> String {
    format!("nplus1={0},nplus1_orm={0},sqlx=warn", level)
}

impl LoggingConfig {
    /// Create production logging configuration
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            pretty_print: false,
            include_location: false,
            env_filter: Some(crate_filter("info")),
        }
    }

    /// Create development logging configuration
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            include_location: true,
            env_filter: Some(crate_filter("debug")),
        }
    }

    /// Create test logging configuration (minimal output)
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            pretty_print: false,
            include_location: false,
            env_filter: Some(crate_filter("error")),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::development(),
            Environment::Testing => Self::test(),
            Environment::Production => Self::production(),
        }
    }

    /// Replace the preset level for this crate and the ORM
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self.env_filter = Some(crate_filter(level));
        self
    }
}

/// Initialize structured logging for the application
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let directives = config.env_filter.as_deref().unwrap_or(&config.level);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))?;

    let layer = Layer::new()
        .with_writer(io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?;
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.pretty())
            .try_init()?;
    } else {
        tracing_subscriber::registry().with(filter).with(layer).try_init()?;
    }

    tracing::debug!(
        level = %config.level,
        format = if config.json_format { "json" } else { "text" },
        "logging initialized"
    );

    Ok(())
}
