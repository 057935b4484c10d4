//! REST errors - failures surfaced by the REST collaborator

use thiserror::Error;

/// REST call failures
///
/// The variants mirror what the caller can act on; the client never retries.
#[derive(Debug, Error)]
pub enum RestError {
    // =========================================================================
    // Status Errors
    // =========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited, retry after {retry_after:.2}s")]
    RateLimited { retry_after: f64 },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl RestError {
    /// Map a non-success status code and server message to an error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Http { status, message },
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
