//! Dispatch event names the client decodes into typed payloads

use std::fmt;

/// Typed dispatch events.
///
/// Every other name is delivered as [`EventPayload::Other`](super::EventPayload::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// Session established after Identify
    Ready,
    /// Session picked up again after Resume
    Resumed,
    /// One page answering Request Guild Members
    GuildMembersChunk,
}

impl GatewayEventType {
    /// Wire name carried in the `t` field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::GuildMembersChunk => "GUILD_MEMBERS_CHUNK",
        }
    }

    /// Look up a wire name; matching is exact
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "READY" => Some(Self::Ready),
            "RESUMED" => Some(Self::Resumed),
            "GUILD_MEMBERS_CHUNK" => Some(Self::GuildMembersChunk),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
