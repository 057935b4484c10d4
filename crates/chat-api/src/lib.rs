//! # chat-api
//!
//! HTTP client for the platform's REST API.

pub mod client;
mod endpoints;
pub mod response;
pub mod routes;

pub use client::{HttpRestClient, CLIENT_USER_AGENT};
pub use routes::Route;
