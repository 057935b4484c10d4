//! # chat-common
//!
//! Shared utilities including configuration, credential resolution, and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    ApiConfig, AppConfig, ConfigError, GatewayConfig, MemberRequestConfig, Token, TOKEN_VAR,
};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
