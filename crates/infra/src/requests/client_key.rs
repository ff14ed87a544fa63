use payflow_domain::constants::CLIENT_KEY_PATH;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::Request;

/// Fetches the public encryption key bound to a client key.
#[derive(Debug, Clone, Serialize)]
pub struct ClientKeyRequest {
    #[serde(skip)]
    client_key: String,
    #[serde(skip)]
    counter: u32,
}

impl ClientKeyRequest {
    /// Lookup of `client_key`.
    pub fn new(client_key: impl Into<String>) -> Self {
        Self { client_key: client_key.into(), counter: 0 }
    }
}

impl Request for ClientKeyRequest {
    type Response = ClientKeyResponse;

    fn path(&self) -> String {
        format!("{CLIENT_KEY_PATH}/{}", self.client_key)
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn counter(&self) -> u32 {
        self.counter
    }

    fn set_counter(&mut self, counter: u32) {
        self.counter = counter;
    }
}

/// Public key bound to the client key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientKeyResponse {
    pub public_key: String,
}
