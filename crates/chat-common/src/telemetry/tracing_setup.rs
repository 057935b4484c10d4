//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with environment-based filtering.
//! Logs always go to stderr; stdout is reserved for action output.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "debug", "trace")
    pub level: Level,
    /// Enable JSON output format
    pub json: bool,
    /// Include file and line numbers
    pub file_line: bool,
    /// Include the event target (module path)
    pub target: bool,
    /// Extra filter directives appended after the level (e.g. "chat_gateway=debug")
    pub directives: Vec<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json: false,
            file_line: false,
            target: false,
            directives: Vec::new(),
        }
    }
}

impl TracingConfig {
    /// Set the base level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Toggle JSON output
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Add a filter directive
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()));

        for directive in &self.directives {
            let parsed = directive
                .parse()
                .map_err(|_| TracingError::InvalidDirective(directive.clone()))?;
            filter = filter.add_directive(parsed);
        }

        Ok(filter)
    }
}

/// Install the global subscriber described by `config`.
///
/// Fails rather than panics when a subscriber is already installed.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = config.env_filter()?;

    if config.json {
        // JSON format for machine consumption
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_target(config.target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| TracingError::AlreadyInitialized)
    } else {
        // Compact human-readable format
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_target(config.target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| TracingError::AlreadyInitialized)
    }
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter directive: {0}")]
    InvalidDirective(String),
}
