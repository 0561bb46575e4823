//! API-specific error types
//!
//! Every failure of a logical request is surfaced as an [`ApiError`]. The
//! classification (timeout, network, server-reported) happens in the HTTP
//! layer; façades propagate these values unchanged.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::messages::user_message;

/// Machine code for timeouts
pub const CODE_TIMEOUT: &str = "TIMEOUT";
/// Machine code for failures without an HTTP response
pub const CODE_NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Attempt exceeded its timeout - retryable
    Timeout,
    /// No response at all (DNS, refused connection) - not retried
    Network,
    /// Server errors (5xx) - retryable
    Server,
    /// Authentication errors (401, 403)
    Authentication,
    /// Client errors (other 4xx) - non-retryable
    Client,
    /// Local failures: encoding, decoding, validation, config, storage
    Local,
}

/// Error body reported by a backend
///
/// `Structured` is produced only when the body is a JSON object carrying a
/// string `message` (or `error`) field; anything else is kept raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerError {
    Structured {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    Unparsed { body: Value },
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    error: Option<String>,
    code: Option<Value>,
    details: Option<Value>,
    errors: Option<Value>,
}

impl ServerError {
    /// Decode a response body into the tagged shape.
    pub fn from_body(body: Value) -> Self {
        if body.is_object() {
            if let Ok(payload) = serde_json::from_value::<ErrorPayload>(body.clone()) {
                if let Some(message) = payload.message.or(payload.error) {
                    let code = payload.code.and_then(|code| match code {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    });
                    return Self::Structured {
                        message,
                        code,
                        details: payload.details.or(payload.errors),
                    };
                }
            }
        }
        Self::Unparsed { body }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Structured { message, .. } => Some(message),
            Self::Unparsed { body: Value::String(text) } if !text.trim().is_empty() => Some(text),
            Self::Unparsed { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Structured { code, .. } => code.as_deref(),
            Self::Unparsed { .. } => None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Structured { details, .. } => details.as_ref(),
            Self::Unparsed { body } if !body.is_null() => Some(body),
            Self::Unparsed { .. } => None,
        }
    }
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {}", .error.message().unwrap_or("request failed"))]
    Http { status: u16, error: ServerError },

    #[error("Failed to decode response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    #[error("Failed to encode request: {0}")]
    Encode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_response(status: u16, body: Value) -> Self {
        Self::Http { status, error: ServerError::from_body(body) }
    }

    /// HTTP status: 408 for timeouts, 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::Timeout(_) => 408,
            Self::Http { status, .. } | Self::Decode { status, .. } => *status,
            Self::Network(_)
            | Self::Encode(_)
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::Storage(_) => 0,
        }
    }

    /// Machine-readable code, passed through from the server for HTTP errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Timeout(_) => Some(CODE_TIMEOUT),
            Self::Network(_) => Some(CODE_NETWORK_ERROR),
            Self::Http { error, .. } => error.code(),
            Self::Decode { .. } => Some("DECODE_ERROR"),
            Self::Encode(_) => Some("ENCODE_ERROR"),
            Self::InvalidInput(_) => Some("VALIDATION_ERROR"),
            Self::Config(_) => Some("CONFIG_ERROR"),
            Self::Storage(_) => Some("STORAGE_ERROR"),
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Http { error, .. } => error.details(),
            _ => None,
        }
    }

    /// Developer-facing message; the server's own message for HTTP errors.
    pub fn message(&self) -> String {
        match self {
            Self::Http { status, error } => error
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {status}")),
            other => other.to_string(),
        }
    }

    /// Human-readable message for display, keyed by status code.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status, error } => user_message(*status, error.message()),
            Self::Timeout(_) => "The request timed out. Please try again.".to_string(),
            Self::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            other => user_message(other.status(), Some(&other.message())),
        }
    }

    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Timeout(_) => ApiErrorCategory::Timeout,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Http { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Http { status: 401 | 403, .. } => ApiErrorCategory::Authentication,
            Self::Http { .. } => ApiErrorCategory::Client,
            Self::Decode { .. }
            | Self::Encode(_)
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::Storage(_) => ApiErrorCategory::Local,
        }
    }

    /// Only timeouts and 5xx responses are retried.
    pub fn should_retry(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Timeout | ApiErrorCategory::Server)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// Serializable snapshot for callers that render or log errors.
    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor {
            message: self.message(),
            status: self.status(),
            code: self.code().map(str::to_string),
            details: self.details().cloned(),
        }
    }
}

/// Flat error shape: message, status, optional code and details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
