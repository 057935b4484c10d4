//! Action catalogue and parameter validation

mod action;
mod kind;
mod params;

pub use action::Action;
pub use kind::{ActionKind, ActionMode};
pub use params::ActionParams;
