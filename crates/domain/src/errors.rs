//! Error types used throughout the payment flows

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ApiErrorResponse, SdkError};

/// Main error type for Payflow
///
/// Every failure a component reports to its delegate is one of these.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PayflowError {
    #[error("API error {}: {}", .0.error_code, .0.error_message)]
    Api(ApiErrorResponse),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Challenge received without a live 3DS2 transaction")]
    MissingTransaction,

    #[error("Unexpected action during the 3DS2 flow")]
    UnexpectedAction,

    #[error("Client key is missing")]
    MissingClientKey,

    #[error("Another 3DS2 step is already running")]
    TransactionInFlight,

    #[error("3DS2 challenge cancelled: {0}")]
    ChallengeCancelled(SdkError),

    #[error("3DS2 SDK error: {0}")]
    Sdk(SdkError),

    #[error("No application can open the redirect URL")]
    AppNotFound,

    #[error("Invalid return URL: {0}")]
    InvalidReturnUrl(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl PayflowError {
    /// True when the shopper (or the host app) stopped the flow rather than
    /// something going wrong.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::ChallengeCancelled(_))
    }
}

impl From<serde_json::Error> for PayflowError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Self::Decode(err.to_string())
        } else {
            Self::Encode(err.to_string())
        }
    }
}

impl From<url::ParseError> for PayflowError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidReturnUrl(err.to_string())
    }
}

/// Result type alias for Payflow operations
pub type Result<T> = std::result::Result<T, PayflowError>;
