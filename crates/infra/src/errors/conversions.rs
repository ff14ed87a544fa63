//! Conversions from external infrastructure errors into domain errors.

use payflow_domain::PayflowError;

use crate::api::ApiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PayflowError);

impl From<InfraError> for PayflowError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PayflowError> for InfraError {
    fn from(value: PayflowError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* ApiError → PayflowError */
/* -------------------------------------------------------------------------- */

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        let error = match value {
            ApiError::Transport(message) => PayflowError::Transport(message),
            ApiError::Timeout(after) => {
                PayflowError::Transport(format!("request timed out after {after:?}"))
            }
            ApiError::Api(response) => PayflowError::Api(response),
            ApiError::Http { status, body } => PayflowError::Http { status, body },
            ApiError::Decode(message) => PayflowError::Decode(message),
            ApiError::Encode(message) => PayflowError::Encode(message),
            ApiError::Config(message) => PayflowError::Config(message),
            ApiError::Cancelled => PayflowError::Cancelled,
        };
        Self(error)
    }
}

impl From<ApiError> for PayflowError {
    fn from(value: ApiError) -> Self {
        InfraError::from(value).into()
    }
}

/* -------------------------------------------------------------------------- */
/* Configuration sources → PayflowError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(PayflowError::Config(format!("Failed to read config file: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(PayflowError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(PayflowError::Config(format!("Invalid JSON format: {value}")))
    }
}
