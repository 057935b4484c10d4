//! Error types shared across the client

mod rest_error;

pub use rest_error::{RestError, RestResult};
