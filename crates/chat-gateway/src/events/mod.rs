//! Gateway events
//!
//! Dispatch events received from the gateway.

mod event_types;
mod gateway_event;
mod payloads;

pub use event_types::GatewayEventType;
pub use gateway_event::{EventPayload, GatewayEvent};
pub use payloads::{GuildMembersChunkEvent, ReadyEvent, ResumedEvent, UnavailableGuild};
