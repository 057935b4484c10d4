//! Response decoding and error mapping
//!
//! Turns non-success responses into [`RestError`] values using the error
//! body the API sends (`{"message": ..., "code": ...}`).

use chat_core::RestError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Error body returned by the API
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human readable description
    #[serde(default)]
    pub message: Option<String>,

    /// API-specific error code
    #[serde(default)]
    pub code: Option<i64>,

    /// Seconds to wait before retrying (429 only)
    #[serde(default)]
    pub retry_after: Option<f64>,
}

impl ErrorBody {
    /// Parse an error body, tolerating empty or non-JSON bodies
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

/// Map a non-success status and its body to a [`RestError`]
#[must_use]
pub fn status_error(status: StatusCode, body: &str) -> RestError {
    let parsed = ErrorBody::parse(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return RestError::RateLimited {
            retry_after: parsed.retry_after.unwrap_or_default(),
        };
    }

    let message = match parsed.message {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        None => body.trim().to_string(),
    };

    RestError::from_status(status.as_u16(), message)
}

/// Map a transport-level reqwest failure
#[must_use]
pub fn transport_error(err: &reqwest::Error) -> RestError {
    if err.is_decode() {
        RestError::Decode(err.to_string())
    } else {
        RestError::Transport(err.to_string())
    }
}
