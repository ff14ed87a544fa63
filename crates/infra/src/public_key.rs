//! Client public key lookup
//!
//! Card encryption needs the public key bound to the client key. Every
//! caller shares one fetch and the key is kept for the provider's lifetime.

use std::sync::Arc;

use payflow_domain::{Config, PayflowError, Result};
use tracing::instrument;

use crate::api::{AnyApiClient, ApiClient, RetryOnErrorApiClient, UniqueAssetApiClient};
use crate::requests::{ClientKeyRequest, ClientKeyResponse};
use crate::scheduling::SimpleScheduler;

/// A failed lookup is tried once more before callers see the error.
const LOOKUP_ATTEMPTS: u32 = 2;

/// Looks up the public key bound to a client key.
pub struct PublicKeyProvider<C> {
    client: UniqueAssetApiClient<C, ClientKeyResponse>,
    client_key: Option<String>,
}

impl<C: AnyApiClient> PublicKeyProvider<C> {
    /// Provider fetching through `client`.
    pub fn new(client: C, client_key: Option<String>) -> Self {
        Self { client: UniqueAssetApiClient::new(client), client_key }
    }

    /// The public key, fetched once and then cached.
    #[instrument(skip_all)]
    pub async fn fetch(&self) -> Result<String> {
        let client_key = self.client_key.as_deref().ok_or(PayflowError::MissingClientKey)?;
        let response = self.client.perform(ClientKeyRequest::new(client_key)).await?;
        Ok(response.public_key)
    }
}

impl PublicKeyProvider<RetryOnErrorApiClient<ApiClient>> {
    /// Provider with its own API client, retried once on failure.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.environment.clone(), &config.http)?;
        let client = RetryOnErrorApiClient::new(api, Arc::new(SimpleScheduler::new(LOOKUP_ATTEMPTS)));
        Ok(Self::new(client, config.client_key.clone()))
    }
}
