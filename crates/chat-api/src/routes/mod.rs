//! Route definitions
//!
//! Every REST endpoint the client calls, relative to the API base URL.

use chat_core::{Snowflake, UserTarget};
use reqwest::Method;

/// A REST endpoint with its parameters filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST /channels/{channel_id}/messages`
    CreateMessage { channel_id: Snowflake },
    /// `GET /guilds/{guild_id}`
    Guild { guild_id: Snowflake },
    /// `GET /guilds/{guild_id}/roles`
    GuildRoles { guild_id: Snowflake },
    /// `GET /guilds/{guild_id}/channels`
    GuildChannels { guild_id: Snowflake },
    /// `GET /users/{user_id}` or `GET /users/@me`
    User { target: UserTarget },
}

impl Route {
    /// HTTP method for this route
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::CreateMessage { .. } => Method::POST,
            Self::Guild { .. }
            | Self::GuildRoles { .. }
            | Self::GuildChannels { .. }
            | Self::User { .. } => Method::GET,
        }
    }

    /// Path below the API base, with a leading slash
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::CreateMessage { channel_id } => format!("/channels/{channel_id}/messages"),
            Self::Guild { guild_id } => format!("/guilds/{guild_id}"),
            Self::GuildRoles { guild_id } => format!("/guilds/{guild_id}/roles"),
            Self::GuildChannels { guild_id } => format!("/guilds/{guild_id}/channels"),
            Self::User { target } => format!("/users/{target}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
