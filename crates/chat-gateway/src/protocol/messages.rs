//! Gateway message format
//!
//! Defines the envelope shared by every WebSocket frame.

use super::{
    HelloPayload, IdentifyPayload, OpCode, PresenceUpdatePayload, RequestGuildMembersPayload,
    ResumePayload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default)]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn client(op: OpCode, d: Option<Value>) -> Self {
        Self {
            op,
            t: None,
            s: None,
            d,
        }
    }

    // === Client Messages ===

    /// Create an Identify message (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::client(OpCode::Identify, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Heartbeat message (op=1) carrying the last sequence seen
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self::client(OpCode::Heartbeat, Some(last_sequence.map_or(Value::Null, Value::from)))
    }

    /// Create a Presence Update message (op=3)
    pub fn presence_update(payload: &PresenceUpdatePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::client(OpCode::PresenceUpdate, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Resume message (op=6)
    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::client(OpCode::Resume, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Request Guild Members message (op=8)
    pub fn request_guild_members(
        payload: &RequestGuildMembersPayload,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::client(OpCode::RequestGuildMembers, Some(serde_json::to_value(payload)?)))
    }

    // === Parsing Server Messages ===

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Try to parse as an Invalid Session (op=9), yielding whether it is resumable
    pub fn as_invalid_session(&self) -> Option<bool> {
        if self.op != OpCode::InvalidSession {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    // === Utilities ===

    /// Check if this is a valid server message
    #[must_use]
    pub fn is_valid_server_message(&self) -> bool {
        self.op.is_server_op()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
