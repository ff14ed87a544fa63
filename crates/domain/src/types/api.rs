//! Error body returned by the payment backend

use serde::{Deserialize, Serialize};

/// Structured error the backend sends instead of a success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error_code: String,
    #[serde(rename = "message")]
    pub error_message: String,
    pub error_type: ApiErrorType,
}

/// Error class reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiErrorType {
    Internal,
    Validation,
    Security,
    Configuration,
    UrlError,
    NoInternet,
    SessionExpired,
    #[serde(other)]
    Unknown,
}
