//! Gateway session
//!
//! Connects, identifies, keeps the link alive, and resumes after drops.

mod config;
mod driver;
mod gateway_session;

pub use config::SessionConfig;
pub use gateway_session::GatewaySession;
