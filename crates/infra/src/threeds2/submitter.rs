//! Fingerprint submission for the compact 3DS2 flow

use async_trait::async_trait;
use payflow_core::FingerprintSubmitter;
use payflow_domain::{PayflowError, Result, ThreeDSActionHandlerResult};
use tracing::{debug, instrument};

use crate::api::AnyApiClient;
use crate::requests::SubmitFingerprintRequest;

/// Posts fingerprints to the backend with the configured client key.
pub struct ApiFingerprintSubmitter<C> {
    client: C,
    client_key: Option<String>,
}

impl<C: AnyApiClient> ApiFingerprintSubmitter<C> {
    /// Submitter posting through `client` with `client_key`.
    pub fn new(client: C, client_key: Option<String>) -> Self {
        Self { client, client_key }
    }
}

#[async_trait]
impl<C: AnyApiClient> FingerprintSubmitter for ApiFingerprintSubmitter<C> {
    #[instrument(skip_all)]
    async fn submit(
        &self,
        fingerprint: &str,
        payment_data: Option<&str>,
    ) -> Result<ThreeDSActionHandlerResult> {
        let client_key = self.client_key.as_deref().ok_or(PayflowError::MissingClientKey)?;
        let request =
            SubmitFingerprintRequest::new(fingerprint, payment_data.map(str::to_owned), client_key);

        let result = ThreeDSActionHandlerResult::from(self.client.perform(&request).await?);
        match &result {
            ThreeDSActionHandlerResult::Action(action) => {
                debug!(kind = action.kind(), "Fingerprint answered with an action");
            }
            ThreeDSActionHandlerResult::Details(_) => debug!("Fingerprint completed the 3DS2 flow"),
        }
        Ok(result)
    }
}
