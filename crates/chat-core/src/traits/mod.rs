//! Collaborator traits (ports)

mod rest;

pub use rest::{RestClient, UserTarget};
