//! Gateway payload definitions
//!
//! `Hello` arrives from the server; everything else here is sent by the client.

use chat_core::Snowflake;
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (41.25 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 41_250;

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::with_interval(Self::DEFAULT_HEARTBEAT_INTERVAL)
    }
}

/// Payload for op 2 (Identify)
///
/// Sent by the client to authenticate the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Authentication token
    pub token: String,

    /// Client connection properties
    pub properties: IdentifyProperties,

    /// Gateway intent bits
    pub intents: u64,

    /// Member count above which offline members are left out of guild payloads
    pub large_threshold: u32,

    /// Presence to apply right after identifying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence: Option<PresenceUpdatePayload>,
}

impl IdentifyPayload {
    /// Create an identify payload with the default connection properties
    #[must_use]
    pub fn new(token: impl Into<String>, intents: u64, large_threshold: u32) -> Self {
        Self {
            token: token.into(),
            properties: IdentifyProperties::default(),
            intents,
            large_threshold,
            presence: None,
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,

    /// Browser or client name
    pub browser: String,

    /// Device type
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: env!("CARGO_PKG_NAME").to_string(),
            device: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Activity shown in a presence ("playing X")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity name
    pub name: String,

    /// Activity type, 0 is "Playing"
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Activity {
    /// Activity type for "Playing {name}"
    pub const PLAYING: u8 = 0;

    /// Create a "Playing" activity
    #[must_use]
    pub fn playing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Self::PLAYING,
        }
    }
}

/// Payload for op 3 (Presence Update)
///
/// Sent by the client to update its status and activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdatePayload {
    /// Unix time in milliseconds since the client went idle
    pub since: Option<u64>,

    /// Activities to display
    pub activities: Vec<Activity>,

    /// New status (online, idle, dnd, invisible, offline)
    pub status: String,

    /// Whether the client is AFK
    pub afk: bool,
}

impl PresenceUpdatePayload {
    /// Online presence showing "Playing {game}".
    ///
    /// An empty game clears the activity.
    #[must_use]
    pub fn playing(game: &str) -> Self {
        let activities = if game.is_empty() {
            Vec::new()
        } else {
            vec![Activity::playing(game)]
        };

        Self {
            since: None,
            activities,
            status: "online".to_string(),
            afk: false,
        }
    }
}

/// Payload for op 6 (Resume)
///
/// Sent by the client to resume a disconnected session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePayload {
    /// Authentication token
    pub token: String,

    /// Session ID to resume
    pub session_id: String,

    /// Last received sequence number
    pub seq: u64,
}

/// Payload for op 8 (Request Guild Members)
///
/// Answered by one or more `GUILD_MEMBERS_CHUNK` dispatches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestGuildMembersPayload {
    /// Guild to enumerate
    pub guild_id: Snowflake,

    /// Username prefix filter, empty matches everyone
    pub query: String,

    /// Maximum members to return, 0 means no limit
    pub limit: u32,

    /// Echoed back in every chunk of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl RequestGuildMembersPayload {
    /// Maximum nonce length the gateway accepts
    pub const MAX_NONCE_LEN: usize = 32;

    /// Create a request for members whose username starts with `query`
    #[must_use]
    pub fn new(guild_id: Snowflake, query: impl Into<String>, limit: u32) -> Self {
        Self {
            guild_id,
            query: query.into(),
            limit,
            nonce: None,
        }
    }

    /// Attach a nonce, truncated to the gateway's maximum length
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        let mut nonce = nonce.into();
        nonce.truncate(Self::MAX_NONCE_LEN);
        self.nonce = Some(nonce);
        self
    }
}
