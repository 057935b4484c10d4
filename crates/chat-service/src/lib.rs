//! # chat-service
//!
//! Action layer: validated actions, the runner that drives them against the
//! gateway and REST collaborators, and the member enumeration used by
//! discriminator search.

pub mod actions;
pub mod enumeration;
pub mod error;
pub mod runner;
pub mod signal;

#[cfg(test)]
mod test_support;

pub use actions::{Action, ActionKind, ActionMode, ActionParams};
pub use enumeration::{DiscriminatorFilter, EnumerationReport, EnumerationState, MemberEnumeration};
pub use error::{ActionError, ActionResult, ValidationError};
pub use runner::{ActionRunner, Console, ConsoleCapture, RunnerContext};
pub use signal::CompletionSignal;
