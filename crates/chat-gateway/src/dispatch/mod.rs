//! Event dispatch
//!
//! Handler registry invoked for every dispatch the session receives.

mod dispatcher;

pub use dispatcher::{EventDispatcher, EventFilter, EventHandler};
