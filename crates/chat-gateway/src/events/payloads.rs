//! Event payload definitions
//!
//! Typed data for the dispatch events this client consumes. Fields not
//! modelled here land in `extra`.

use chat_core::{GuildMember, Snowflake, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// === Connection Events ===

/// READY event payload
///
/// Sent after successful Identify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    #[serde(default)]
    pub v: u8,

    /// Current user
    pub user: User,

    /// Guilds the user is in (initially unavailable)
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,

    /// Session ID for resuming
    pub session_id: String,

    /// Gateway URL for resuming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_gateway_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReadyEvent {
    /// Ids of every guild listed in the event, in listed order
    #[must_use]
    pub fn guild_ids(&self) -> Vec<Snowflake> {
        self.guilds.iter().map(|g| g.id).collect()
    }
}

/// RESUMED event payload
///
/// Sent after successful Resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumedEvent {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Unavailable guild in READY event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

// === Member Events ===

/// GUILD_MEMBERS_CHUNK event payload
///
/// One page of the answer to a Request Guild Members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMembersChunkEvent {
    pub guild_id: Snowflake,

    #[serde(default)]
    pub members: Vec<GuildMember>,

    /// Zero-based index of this chunk
    #[serde(default)]
    pub chunk_index: u32,

    /// Total chunks for the request
    #[serde(default)]
    pub chunk_count: u32,

    /// Nonce echoed from the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GuildMembersChunkEvent {
    /// Check if this is the final chunk of its request
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.chunk_index + 1 >= self.chunk_count
    }
}
