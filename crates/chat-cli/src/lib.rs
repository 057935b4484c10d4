//! # chat-cli
//!
//! Command-line front end: parses flags, resolves the credential and
//! settings, and hands a validated action to the runner.

pub mod app;
pub mod args;

pub use app::{run, Backend, CliConfig, CliError};
pub use args::Cli;
