//! Configuration structs

mod app_config;

pub use app_config::{
    intents, ApiConfig, AppConfig, ConfigError, GatewayConfig, MemberRequestConfig, Token,
    TOKEN_VAR,
};
