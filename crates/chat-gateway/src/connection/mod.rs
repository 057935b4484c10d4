//! Gateway connection
//!
//! Socket setup and the link state shared with the session driver.

mod connection;
mod socket;

pub use connection::{Connection, ConnectionState, ResumeInfo};
pub use socket::{connect, GatewaySocket, HELLO_TIMEOUT};
