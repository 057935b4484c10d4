//! Gateway error types

use crate::protocol::CloseCode;
use std::time::Duration;
use thiserror::Error;

/// Gateway session error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// WebSocket connect or I/O failure
    #[error("Failed to connect to gateway: {0}")]
    Connect(String),

    /// First frame was not a usable Hello
    #[error("Gateway handshake failed: {0}")]
    Handshake(String),

    /// Token rejected by the gateway
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Gateway closed the connection with a code that forbids reconnecting
    #[error("Gateway closed the connection ({code}): {reason}")]
    Closed { code: u16, reason: String },

    /// Session invalidated before READY
    #[error("Session invalidated by gateway")]
    InvalidSession,

    /// READY did not arrive in time
    #[error("Timed out after {0:?} waiting for READY")]
    ReadyTimeout(Duration),

    /// Connection dropped and could not be re-established
    #[error("Gateway connection lost: {0}")]
    ConnectionLost(String),

    /// Operation needs an open session
    #[error("Gateway session is not connected")]
    NotConnected,

    /// `open` called on a session that is already open
    #[error("Gateway session is already open")]
    AlreadyOpen,

    /// Payload could not be encoded or decoded
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl GatewayError {
    /// Build the error for a close frame the session cannot recover from
    #[must_use]
    pub fn from_close(code: u16, reason: &str) -> Self {
        let reason = if reason.is_empty() {
            CloseCode::from_u16(code).map_or("connection closed", CloseCode::description)
        } else {
            reason
        };

        match CloseCode::from_u16(code) {
            Some(CloseCode::AuthenticationFailed) => Self::AuthenticationFailed(reason.to_string()),
            _ => Self::Closed {
                code,
                reason: reason.to_string(),
            },
        }
    }

    /// Gateway close code behind this error, if any
    #[must_use]
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::AuthenticationFailed(_) => Some(CloseCode::AuthenticationFailed),
            Self::Closed { code, .. } => CloseCode::from_u16(*code),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connect(err.to_string())
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;
