//! API-specific error types
//!
//! Provides error classification for API operations with retry metadata.

use std::time::Duration;

use payflow_domain::ApiErrorResponse;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - non-retryable
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Payloads that could not be encoded or decoded - non-retryable
    Protocol,
    /// Configuration errors and cancellation - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Structured error body returned by the backend.
    #[error("API error {}: {}", .0.error_code, .0.error_message)]
    Api(ApiErrorResponse),

    /// Non-2xx response without a structured error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Api(response) => response.status.map_or(ApiErrorCategory::Client, category_for_status),
            Self::Http { status, .. } => category_for_status(*status),
            Self::Decode(_) | Self::Encode(_) => ApiErrorCategory::Protocol,
            Self::Config(_) | Self::Cancelled => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }
}

fn category_for_status(status: u16) -> ApiErrorCategory {
    match status {
        401 | 403 => ApiErrorCategory::Authentication,
        429 => ApiErrorCategory::RateLimit,
        500..=599 => ApiErrorCategory::Server,
        _ => ApiErrorCategory::Client,
    }
}
