use std::collections::BTreeMap;

use payflow_domain::constants::SUBMIT_FINGERPRINT_PATH;
use payflow_domain::{Action, ThreeDS2Details, ThreeDSActionHandlerResult, ThreeDSResult};
use serde::{Deserialize, Serialize};

use super::client_key_query;
use crate::api::Request;

/// Sends the compact-flow fingerprint to the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFingerprintRequest {
    pub fingerprint_result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip)]
    client_key: String,
    #[serde(skip)]
    counter: u32,
}

impl SubmitFingerprintRequest {
    /// Submission of `fingerprint` for the flow identified by `payment_data`.
    pub fn new(
        fingerprint_result: impl Into<String>,
        payment_data: Option<String>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint_result: fingerprint_result.into(),
            payment_data,
            client_key: client_key.into(),
            counter: 0,
        }
    }
}

impl Request for SubmitFingerprintRequest {
    type Response = SubmitFingerprintResponse;

    fn path(&self) -> String {
        SUBMIT_FINGERPRINT_PATH.to_string()
    }

    fn query_parameters(&self) -> BTreeMap<String, String> {
        client_key_query(&self.client_key)
    }

    fn counter(&self) -> u32 {
        self.counter
    }

    fn set_counter(&mut self, counter: u32) {
        self.counter = counter;
    }
}

/// Details of a completed compact flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletedDetails {
    #[serde(rename = "threeDSResult")]
    pub three_ds_result: String,
}

/// Either a follow-up action or the finished 3DS2 result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubmitFingerprintResponse {
    Action { action: Action },
    Completed { details: CompletedDetails },
}

impl From<SubmitFingerprintResponse> for ThreeDSActionHandlerResult {
    fn from(response: SubmitFingerprintResponse) -> Self {
        match response {
            SubmitFingerprintResponse::Action { action } => Self::Action(action),
            SubmitFingerprintResponse::Completed { details } => {
                Self::Details(ThreeDS2Details::Completed(ThreeDSResult::new(details.three_ds_result)))
            }
        }
    }
}
