//! Application configuration structs
//!
//! Builds endpoint and tuning configuration from a variable lookup, usually
//! the process environment, and resolves the credential.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the credential when no flag is given
pub const TOKEN_VAR: &str = "DG_TOKEN";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub gateway: GatewayConfig,
    pub members: MemberRequestConfig,
}

/// REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Gateway connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// How long `open` waits for READY after Identify
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_intents")]
    pub intents: u64,
    #[serde(default = "default_large_threshold")]
    pub large_threshold: u32,
    #[serde(default = "default_reconnect_attempts")]
    pub reconnect_attempts: u32,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
}

impl GatewayConfig {
    #[must_use]
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// Bulk member request pacing
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRequestConfig {
    /// Minimum pause between two guilds' member requests
    #[serde(default = "default_request_interval")]
    pub request_interval_ms: u64,
}

impl MemberRequestConfig {
    #[must_use]
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

/// Gateway intent bits used by the default configuration
pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MEMBERS: u64 = 1 << 1;
    pub const GUILD_PRESENCES: u64 = 1 << 8;
}

// Default value functions
fn default_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_ready_timeout() -> u64 {
    30
}

fn default_intents() -> u64 {
    intents::GUILDS | intents::GUILD_MEMBERS | intents::GUILD_PRESENCES
}

fn default_large_threshold() -> u32 {
    250
}

fn default_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay() -> u64 {
    1000
}

fn default_request_interval() -> u64 {
    1000 // one request per second
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: default_api_url(),
                timeout_secs: default_http_timeout(),
            },
            gateway: GatewayConfig {
                url: default_gateway_url(),
                ready_timeout_secs: default_ready_timeout(),
                intents: default_intents(),
                large_threshold: default_large_threshold(),
                reconnect_attempts: default_reconnect_attempts(),
                reconnect_delay_ms: default_reconnect_delay(),
            },
            members: MemberRequestConfig::default(),
        }
    }
}

impl Default for MemberRequestConfig {
    fn default() -> Self {
        Self {
            request_interval_ms: default_request_interval(),
        }
    }
}

impl AppConfig {
    /// Build configuration from an arbitrary variable source
    ///
    /// Unset variables fall back to defaults; set but malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api: ApiConfig {
                base_url: lookup("DG_API_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.api.base_url),
                timeout_secs: parse_var(&lookup, "DG_HTTP_TIMEOUT_SECS")?
                    .unwrap_or(defaults.api.timeout_secs),
            },
            gateway: GatewayConfig {
                url: lookup("DG_GATEWAY_URL").unwrap_or(defaults.gateway.url),
                ready_timeout_secs: parse_var(&lookup, "DG_READY_TIMEOUT_SECS")?
                    .unwrap_or(defaults.gateway.ready_timeout_secs),
                intents: parse_var(&lookup, "DG_GATEWAY_INTENTS")?
                    .unwrap_or(defaults.gateway.intents),
                large_threshold: parse_var(&lookup, "DG_LARGE_THRESHOLD")?
                    .unwrap_or(defaults.gateway.large_threshold),
                reconnect_attempts: parse_var(&lookup, "DG_RECONNECT_ATTEMPTS")?
                    .unwrap_or(defaults.gateway.reconnect_attempts),
                reconnect_delay_ms: parse_var(&lookup, "DG_RECONNECT_DELAY_MS")?
                    .unwrap_or(defaults.gateway.reconnect_delay_ms),
            },
            members: MemberRequestConfig {
                request_interval_ms: parse_var(&lookup, "DG_MEMBER_REQUEST_INTERVAL_MS")?
                    .unwrap_or(defaults.members.request_interval_ms),
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
    }
}

/// Authentication credential
///
/// Sent verbatim in Identify and the `Authorization` header. `Debug` never
/// prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Resolve the credential from a flag value, falling back to `DG_TOKEN`
    ///
    /// # Errors
    /// Returns `ConfigError::MissingToken` if neither source yields a non-empty value
    pub fn resolve<F>(flag: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        flag.map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty()))
            .map(|t| Self(t.trim().to_string()))
            .ok_or(ConfigError::MissingToken)
    }

    /// Get the raw credential
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(****)")
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No token specified (either env var DG_TOKEN or arg)")]
    MissingToken,

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
