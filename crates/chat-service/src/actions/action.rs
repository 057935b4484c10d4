//! Validated actions
//!
//! Raw flag values become an [`Action`] before any connection is made, so a
//! missing parameter never reaches the transport.

use chat_core::{Snowflake, UserTarget};

use super::{ActionKind, ActionParams};
use crate::error::ValidationError;

/// An action with its parameters checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SendMessage { channel: Snowflake, message: String },
    Gateway,
    DumpAll,
    GuildRoles { guild: Snowflake },
    Guild { guild: Snowflake },
    DiscrimSearch { discriminator: String, skip: Option<Snowflake> },
    /// `None` dumps the authenticated user
    DumpUser { user: Option<UserTarget> },
    Channels { guild: Snowflake },
    /// An empty presence clears the activity
    SetPresence { presence: String },
}

impl Action {
    /// Build an action of `kind` from raw flag values.
    ///
    /// Empty strings count as absent.
    pub fn from_params(kind: ActionKind, params: &ActionParams) -> Result<Self, ValidationError> {
        let action = match kind {
            ActionKind::SendMessage => {
                let channel = present(&params.channel).ok_or(ValidationError::MissingChannel)?;
                let message = present(&params.message).ok_or(ValidationError::MissingMessage)?;
                Action::SendMessage {
                    channel: parse_id("channel", channel)?,
                    message: message.to_string(),
                }
            }
            ActionKind::Gateway => Action::Gateway,
            ActionKind::DumpAll => Action::DumpAll,
            ActionKind::GuildRoles => Action::GuildRoles {
                guild: required_guild(params)?,
            },
            ActionKind::Guild => Action::Guild {
                guild: required_guild(params)?,
            },
            ActionKind::Channels => Action::Channels {
                guild: required_guild(params)?,
            },
            ActionKind::DiscrimSearch => {
                let discriminator = present(&params.discriminator)
                    .ok_or(ValidationError::MissingDiscriminator)?;
                let skip = present(&params.skip)
                    .map(|skip| parse_id("skip", skip))
                    .transpose()?;
                Action::DiscrimSearch {
                    discriminator: discriminator.trim().to_string(),
                    skip,
                }
            }
            ActionKind::DumpUser => {
                let user = present(&params.user)
                    .map(|user| {
                        UserTarget::parse(user).map_err(|_| ValidationError::invalid_id("user", user))
                    })
                    .transpose()?;
                Action::DumpUser { user }
            }
            ActionKind::SetPresence => Action::SetPresence {
                presence: params.presence.clone().unwrap_or_default(),
            },
        };
        Ok(action)
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SendMessage { .. } => ActionKind::SendMessage,
            Action::Gateway => ActionKind::Gateway,
            Action::DumpAll => ActionKind::DumpAll,
            Action::GuildRoles { .. } => ActionKind::GuildRoles,
            Action::Guild { .. } => ActionKind::Guild,
            Action::DiscrimSearch { .. } => ActionKind::DiscrimSearch,
            Action::DumpUser { .. } => ActionKind::DumpUser,
            Action::Channels { .. } => ActionKind::Channels,
            Action::SetPresence { .. } => ActionKind::SetPresence,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_id(what: &'static str, value: &str) -> Result<Snowflake, ValidationError> {
    Snowflake::parse(value).map_err(|_| ValidationError::invalid_id(what, value))
}

fn required_guild(params: &ActionParams) -> Result<Snowflake, ValidationError> {
    let guild = present(&params.guild).ok_or(ValidationError::MissingGuild)?;
    parse_id("guild", guild)
}
