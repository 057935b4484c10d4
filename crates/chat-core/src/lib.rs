//! # chat-core
//!
//! Domain layer containing the platform records, value objects, and the REST port.
//! This crate has zero dependencies on infrastructure (HTTP client, WebSocket, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, CreateMessage, Guild, GuildMember, Message, Role, User};
pub use error::{RestError, RestResult};
pub use traits::{RestClient, UserTarget};
pub use value_objects::{Snowflake, SnowflakeParseError};
