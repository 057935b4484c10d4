//! Message record - represents a chat message

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// Message record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a create-message request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessage {
    pub content: String,
}

impl CreateMessage {
    /// Create a plain text message body
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
