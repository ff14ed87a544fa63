//! Port interfaces for the 3DS2 SDK and the fingerprint endpoint

use std::sync::Arc;

use async_trait::async_trait;
use payflow_domain::{
    AppearanceConfiguration, AuthenticationRequestParameters, ChallengeParameters,
    ChallengeResult, Result, SdkError, ServiceParameters, ThreeDSActionHandlerResult,
};

/// Entry point of the native 3DS2 SDK.
#[async_trait]
pub trait ThreeDSService: Send + Sync {
    /// Prepares the SDK for the directory server named in `parameters`.
    async fn initialize(
        &self,
        parameters: ServiceParameters,
        appearance: &AppearanceConfiguration,
    ) -> std::result::Result<(), SdkError>;

    /// Creates a transaction for `message_version`.
    fn create_transaction(
        &self,
        message_version: &str,
    ) -> std::result::Result<Arc<dyn ThreeDSTransaction>, SdkError>;
}

/// One in-progress 3DS2 authentication attempt.
#[async_trait]
pub trait ThreeDSTransaction: Send + Sync {
    /// Device data to put in the fingerprint.
    fn authentication_parameters(&self) -> AuthenticationRequestParameters;

    /// Runs the challenge UI. The SDK reports a result, an error, or (by
    /// contract never) neither.
    async fn perform_challenge(
        &self,
        parameters: ChallengeParameters,
    ) -> (Option<ChallengeResult>, Option<SdkError>);
}

/// Sends an encoded fingerprint to the backend (compact flow).
#[async_trait]
pub trait FingerprintSubmitter: Send + Sync {
    /// Posts `fingerprint`; the backend answers with an action or final details.
    async fn submit(
        &self,
        fingerprint: &str,
        payment_data: Option<&str>,
    ) -> Result<ThreeDSActionHandlerResult>;
}
