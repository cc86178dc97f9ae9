//! Custom error types for the common library
//!
//! This module defines the single typed error thrown by the API client.
//! Callers pattern-match on the numeric status to choose user-facing copy;
//! transport failures (no response at all) report status 0.

use serde_json::Value;
use thiserror::Error;

/// Custom error type for API calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was received from the server
    #[error("could not reach the server")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable message, taken from the error body when available
        message: String,
        /// Raw parsed response body, kept for diagnostics
        details: Option<Value>,
    },

    /// A 2xx response body did not match the expected shape
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Build a status error, extracting the message from a JSON error body
    /// when one is present and falling back to a generic message otherwise.
    pub fn from_status(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        ApiError::Status {
            status,
            message,
            details: body,
        }
    }

    /// Numeric status of the failure; 0 for transport-level failures
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Transport(_) | ApiError::Decode(_) => 0,
            ApiError::Status { status, .. } => *status,
        }
    }

    /// Whether this failure is an HTTP 401
    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// Message suitable for display, with a caller-provided fallback
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
