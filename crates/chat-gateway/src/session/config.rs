//! Session configuration

use chat_common::{GatewayConfig, Token};
use std::time::Duration;

/// Settings for one gateway session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Gateway WebSocket URL
    pub url: String,
    /// Credential sent in Identify and Resume
    pub token: Token,
    /// Gateway intent bits
    pub intents: u64,
    /// Member count above which offline members are omitted
    pub large_threshold: u32,
    /// How long `open` waits for READY
    pub ready_timeout: Duration,
    /// Reconnect tries after a drop, per drop
    pub reconnect_attempts: u32,
    /// Pause before each reconnect try
    pub reconnect_delay: Duration,
}

impl SessionConfig {
    /// Build from the loaded gateway settings
    #[must_use]
    pub fn new(token: Token, gateway: &GatewayConfig) -> Self {
        Self {
            url: gateway.url.clone(),
            token,
            intents: gateway.intents,
            large_threshold: gateway.large_threshold,
            ready_timeout: gateway.ready_timeout(),
            reconnect_attempts: gateway.reconnect_attempts,
            reconnect_delay: gateway.reconnect_delay(),
        }
    }

    /// URL to reconnect to when resuming against `resume_url`.
    ///
    /// The resume URL carries no query, so the configured version and
    /// encoding parameters are appended.
    #[must_use]
    pub fn resume_endpoint(&self, resume_url: &str) -> String {
        match self.url.split_once('?') {
            Some((_, query)) if !resume_url.contains('?') => {
                format!("{}/?{query}", resume_url.trim_end_matches('/'))
            }
            _ => resume_url.to_string(),
        }
    }
}
