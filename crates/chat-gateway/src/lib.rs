//! # chat-gateway
//!
//! WebSocket gateway client: session lifecycle, heartbeats, and event
//! dispatch to registered handlers.

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod protocol;
pub mod session;
pub mod transport;

pub use connection::ConnectionState;
pub use dispatch::{EventDispatcher, EventFilter, EventHandler};
pub use error::{GatewayError, GatewayResult};
pub use events::{EventPayload, GatewayEvent, GatewayEventType, GuildMembersChunkEvent, ReadyEvent};
pub use protocol::PresenceUpdatePayload;
pub use session::{GatewaySession, SessionConfig};
pub use transport::GatewayTransport;
