//! Action layer error types

use chat_core::RestError;
use chat_gateway::GatewayError;
use thiserror::Error;

/// A required action parameter is missing or malformed
///
/// Raised while building an [`Action`](crate::Action), before any connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No channel specified (-c channel)")]
    MissingChannel,

    #[error("No message specified (-m message)")]
    MissingMessage,

    #[error("No guild specified (-g guild)")]
    MissingGuild,

    #[error("No discriminator specified (-d discrim)")]
    MissingDiscriminator,

    #[error("Invalid {what} id: {value}")]
    InvalidId { what: &'static str, value: String },
}

impl ValidationError {
    /// Create an invalid id error
    pub fn invalid_id(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            what,
            value: value.into(),
        }
    }
}

/// Action failure
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// REST failure tagged with the action that issued the call
    #[error("{action}: {source}")]
    Rest {
        action: &'static str,
        #[source]
        source: RestError,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ActionError {
    /// Wrap a REST error with the action name
    pub fn rest(action: &'static str) -> impl FnOnce(RestError) -> Self {
        move |source| Self::Rest { action, source }
    }
}

/// Action result type
pub type ActionResult<T> = Result<T, ActionError>;
