//! User record - represents a chat user as returned by the platform

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::Snowflake;

/// User record
///
/// Only the fields the client acts on are typed; everything else the server
/// sent is kept in `extra` so a dump reproduces the original field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bot: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: discriminator.into(),
            avatar: None,
            bot: false,
            extra: Map::new(),
        }
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }
}
