//! Member record - represents a user's membership in a guild

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// Guild member record, as delivered in member chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMember {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
