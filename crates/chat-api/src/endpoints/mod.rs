//! Endpoint methods
//!
//! One module per resource, each adding methods to [`HttpRestClient`](crate::HttpRestClient).

mod channels;
mod guilds;
mod messages;
mod roles;
mod users;
