//! Backend requests used by the action components

mod client_key;
mod fingerprint;
mod payment_status;

pub use client_key::{ClientKeyRequest, ClientKeyResponse};
pub use fingerprint::{SubmitFingerprintRequest, SubmitFingerprintResponse};
pub use payment_status::{PaymentResultCode, PaymentStatusRequest, PaymentStatusResponse};

use std::collections::BTreeMap;

use payflow_domain::constants::CLIENT_KEY_QUERY_ITEM;

/// Query items that authenticate a request with the client key.
fn client_key_query(client_key: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(CLIENT_KEY_QUERY_ITEM.to_string(), client_key.to_string())])
}
