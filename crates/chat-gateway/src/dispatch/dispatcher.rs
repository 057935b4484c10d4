//! Event dispatcher
//!
//! Routes decoded dispatch events to the handlers registered for them.

use crate::events::{GatewayEvent, GatewayEventType, GuildMembersChunkEvent, ReadyEvent};
use parking_lot::RwLock;
use std::sync::Arc;

/// Callback invoked for each matching event.
///
/// Handlers run synchronously on the session's reader task, so they must
/// not block. Long work belongs in a spawned task.
pub type EventHandler = Arc<dyn Fn(&GatewayEvent) + Send + Sync>;

/// Which events a handler subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Every dispatch event, including unknown names
    Any,
    /// Only events of one type
    Type(GatewayEventType),
}

impl EventFilter {
    fn matches(self, event: &GatewayEvent) -> bool {
        match self {
            Self::Any => true,
            Self::Type(kind) => event.event_type() == Some(kind),
        }
    }
}

/// Registry of event handlers
///
/// Handlers fire in registration order. Registering from inside a handler
/// is allowed and takes effect from the next dispatch.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<(EventFilter, EventHandler)>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events matching `filter`
    pub fn register(&self, filter: EventFilter, handler: EventHandler) {
        self.handlers.write().push((filter, handler));
    }

    /// Register a handler for every event
    pub fn on_any<F>(&self, handler: F)
    where
        F: Fn(&GatewayEvent) + Send + Sync + 'static,
    {
        self.register(EventFilter::Any, Arc::new(handler));
    }

    /// Register a handler for READY
    pub fn on_ready<F>(&self, handler: F)
    where
        F: Fn(&ReadyEvent) + Send + Sync + 'static,
    {
        self.register(
            EventFilter::Type(GatewayEventType::Ready),
            Arc::new(move |event| {
                if let Some(ready) = event.as_ready() {
                    handler(ready);
                }
            }),
        );
    }

    /// Register a handler for GUILD_MEMBERS_CHUNK
    pub fn on_guild_members_chunk<F>(&self, handler: F)
    where
        F: Fn(&GuildMembersChunkEvent) + Send + Sync + 'static,
    {
        self.register(
            EventFilter::Type(GatewayEventType::GuildMembersChunk),
            Arc::new(move |event| {
                if let Some(chunk) = event.as_guild_members_chunk() {
                    handler(chunk);
                }
            }),
        );
    }

    /// Deliver an event to every matching handler, returning how many ran
    pub fn dispatch(&self, event: &GatewayEvent) -> usize {
        // Snapshot so handlers may register without deadlocking
        let matching: Vec<EventHandler> = self
            .handlers
            .read()
            .iter()
            .filter(|(filter, _)| filter.matches(event))
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &matching {
            handler(event);
        }

        tracing::trace!(event = event.name(), handlers = matching.len(), "Dispatched event");
        matching.len()
    }

    /// Number of registered handlers
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
