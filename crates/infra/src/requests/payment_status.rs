use std::collections::BTreeMap;

use payflow_domain::constants::PAYMENT_STATUS_PATH;
use serde::{Deserialize, Serialize};

use super::client_key_query;
use crate::api::Request;

/// Asks for the current status of a payment waiting on the shopper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_data: String,
    #[serde(skip)]
    client_key: String,
    #[serde(skip)]
    counter: u32,
}

impl PaymentStatusRequest {
    /// Status query for `payment_data`.
    pub fn new(payment_data: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self { payment_data: payment_data.into(), client_key: client_key.into(), counter: 0 }
    }
}

impl Request for PaymentStatusRequest {
    type Response = PaymentStatusResponse;

    fn path(&self) -> String {
        PAYMENT_STATUS_PATH.to_string()
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

/// Payment state reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentResultCode {
    Authorised,
    Refused,
    Pending,
    Cancelled,
    Error,
    Received,
    #[serde(other)]
    Unknown,
}

impl PaymentResultCode {
    /// The shopper has not finished yet; ask again later.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending | Self::Received)
    }
}

/// Status endpoint answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub payload: String,
    pub result_code: PaymentResultCode,
}
