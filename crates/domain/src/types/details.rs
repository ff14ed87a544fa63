//! Payloads a component hands to its delegate

use serde::{Deserialize, Serialize};

use crate::types::{RedirectDetails, ThreeDS2Details};

/// Details produced by an await (status polling) flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitActionDetails {
    pub payload: String,
}

/// Details of any component, serialised as a flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionDetails {
    ThreeDS2(ThreeDS2Details),
    Redirect(RedirectDetails),
    Await(AwaitActionDetails),
}

impl From<ThreeDS2Details> for ActionDetails {
    fn from(details: ThreeDS2Details) -> Self {
        Self::ThreeDS2(details)
    }
}

impl From<RedirectDetails> for ActionDetails {
    fn from(details: RedirectDetails) -> Self {
        Self::Redirect(details)
    }
}

impl From<AwaitActionDetails> for ActionDetails {
    fn from(details: AwaitActionDetails) -> Self {
        Self::Await(details)
    }
}

/// What the merchant submits to `/payments/details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionComponentData {
    pub details: ActionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}

impl ActionComponentData {
    /// Wraps `details` with the continuation token to echo.
    pub fn new(details: impl Into<ActionDetails>, payment_data: Option<String>) -> Self {
        Self { details: details.into(), payment_data }
    }
}
