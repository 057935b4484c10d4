//! Action execution

mod console;
mod context;
mod format;
mod runner;

pub use console::{Console, ConsoleCapture, SharedBuffer};
pub use context::RunnerContext;
pub use format::{role_line, to_indented_json};
pub use runner::ActionRunner;
