//! Actions the payment backend asks the client to perform
//!
//! Actions are internally tagged by `type`. The unified 3DS2 action adds a
//! second `subtype` tag for the fingerprint/challenge split.

use serde::{Deserialize, Serialize};
use url::Url;

/// Next step the backend asks the client to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "redirect")]
    Redirect(RedirectAction),

    #[serde(rename = "threeDS2Fingerprint")]
    ThreeDS2Fingerprint(ThreeDS2FingerprintAction),

    #[serde(rename = "threeDS2Challenge")]
    ThreeDS2Challenge(ThreeDS2ChallengeAction),

    #[serde(rename = "threeDS2")]
    ThreeDS2(ThreeDS2Action),

    #[serde(rename = "await")]
    Await(AwaitAction),
}

impl Action {
    /// Wire name of the action, for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Redirect(_) => "redirect",
            Self::ThreeDS2Fingerprint(_) => "threeDS2Fingerprint",
            Self::ThreeDS2Challenge(_) => "threeDS2Challenge",
            Self::ThreeDS2(ThreeDS2Action::Fingerprint(_)) => "threeDS2/fingerprint",
            Self::ThreeDS2(ThreeDS2Action::Challenge(_)) => "threeDS2/challenge",
            Self::Await(_) => "await",
        }
    }

    /// Continuation token to echo back, when the action carries one.
    pub fn payment_data(&self) -> Option<&str> {
        match self {
            Self::Redirect(action) => action.payment_data.as_deref(),
            Self::ThreeDS2Fingerprint(action) => action.payment_data.as_deref(),
            Self::ThreeDS2Challenge(action) => action.payment_data.as_deref(),
            Self::ThreeDS2(action) => action.payment_data(),
            Self::Await(action) => Some(&action.payment_data),
        }
    }
}

/// Send the shopper to a URL and wait for the return URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectAction {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}

/// Legacy fingerprint step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDS2FingerprintAction {
    #[serde(rename = "token")]
    pub fingerprint_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorisation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}

/// Legacy challenge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDS2ChallengeAction {
    #[serde(rename = "token")]
    pub challenge_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorisation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}

/// Unified 3DS2 action, split by `subtype`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum ThreeDS2Action {
    Fingerprint(ThreeDS2FingerprintAction),
    Challenge(ThreeDS2ChallengeAction),
}

impl ThreeDS2Action {
    /// Continuation token of whichever step this is.
    pub fn payment_data(&self) -> Option<&str> {
        match self {
            Self::Fingerprint(action) => action.payment_data.as_deref(),
            Self::Challenge(action) => action.payment_data.as_deref(),
        }
    }
}

/// Wait for the shopper to approve the payment somewhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwaitAction {
    pub payment_data: String,
    pub payment_method_type: String,
}
