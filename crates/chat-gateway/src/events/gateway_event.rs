//! Decoded dispatch events

use serde_json::Value;

use super::{GatewayEventType, GuildMembersChunkEvent, ReadyEvent, ResumedEvent};

/// Typed view of a dispatch's data
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// Session established
    Ready(Box<ReadyEvent>),
    /// Session resumed after a reconnect
    Resumed(ResumedEvent),
    /// One page of guild members
    GuildMembersChunk(GuildMembersChunkEvent),
    /// No typed model; only the raw data is available
    Other,
}

/// A dispatch event delivered to registered handlers.
///
/// Keeps the data exactly as the gateway sent it next to the typed payload,
/// so dumps show the server's own field order and values.
#[derive(Debug, Clone)]
pub struct GatewayEvent {
    name: String,
    data: Value,
    payload: EventPayload,
}

impl GatewayEvent {
    /// Decode a dispatch by its event name.
    ///
    /// Names without a typed payload decode to [`EventPayload::Other`].
    pub fn decode(name: &str, data: Value) -> Result<Self, serde_json::Error> {
        let payload = match GatewayEventType::from_name(name) {
            Some(GatewayEventType::Ready) => {
                EventPayload::Ready(Box::new(serde_json::from_value(data.clone())?))
            }
            Some(GatewayEventType::Resumed) => {
                EventPayload::Resumed(serde_json::from_value(data.clone())?)
            }
            Some(GatewayEventType::GuildMembersChunk) => {
                EventPayload::GuildMembersChunk(serde_json::from_value(data.clone())?)
            }
            None => EventPayload::Other,
        };

        Ok(Self {
            name: name.to_string(),
            data,
            payload,
        })
    }

    /// An event carried only as raw data
    #[must_use]
    pub fn untyped(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
            payload: EventPayload::Other,
        }
    }

    /// Wire name of the event
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Known event type, if the name is one this client decodes
    #[must_use]
    pub fn event_type(&self) -> Option<GatewayEventType> {
        GatewayEventType::from_name(&self.name)
    }

    /// Event data as received
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Typed payload
    #[must_use]
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// READY payload, if this is READY
    #[must_use]
    pub fn as_ready(&self) -> Option<&ReadyEvent> {
        match &self.payload {
            EventPayload::Ready(ready) => Some(ready.as_ref()),
            _ => None,
        }
    }

    /// Member page, if this is GUILD_MEMBERS_CHUNK
    #[must_use]
    pub fn as_guild_members_chunk(&self) -> Option<&GuildMembersChunkEvent> {
        match &self.payload {
            EventPayload::GuildMembersChunk(chunk) => Some(chunk),
            _ => None,
        }
    }
}
