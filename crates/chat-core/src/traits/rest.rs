//! REST client trait (port) - the request/response operations the actions need
//!
//! The action layer defines what it needs; `chat-api` provides the HTTP
//! implementation and tests provide in-memory ones.

use std::fmt;

use async_trait::async_trait;

use crate::entities::{Channel, Guild, Message, Role, User};
use crate::error::RestResult;
use crate::value_objects::{Snowflake, SnowflakeParseError};

/// Which user a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserTarget {
    /// The authenticated user (`@me`)
    Me,
    /// A specific user by id
    Id(Snowflake),
}

impl UserTarget {
    /// Parse a user flag value; `@me` selects the current user
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        if s.eq_ignore_ascii_case("@me") {
            Ok(Self::Me)
        } else {
            Snowflake::parse(s).map(Self::Id)
        }
    }
}

impl fmt::Display for UserTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Me => f.write_str("@me"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

// ============================================================================
// REST Client
// ============================================================================

#[async_trait]
pub trait RestClient: Send + Sync {
    /// Post a plain text message to a channel
    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> RestResult<Message>;

    /// Fetch a guild by id
    async fn guild(&self, guild_id: Snowflake) -> RestResult<Guild>;

    /// Fetch all roles of a guild
    async fn guild_roles(&self, guild_id: Snowflake) -> RestResult<Vec<Role>>;

    /// Fetch all channels of a guild
    async fn guild_channels(&self, guild_id: Snowflake) -> RestResult<Vec<Channel>>;

    /// Fetch a user, or the authenticated user for `UserTarget::Me`
    async fn user(&self, target: UserTarget) -> RestResult<User>;
}
