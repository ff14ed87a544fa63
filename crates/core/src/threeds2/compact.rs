//! Compact 3DS2 flow: the fingerprint is submitted here

use std::sync::Arc;

use async_trait::async_trait;
use payflow_domain::{
    Result, ThreeDS2ChallengeAction, ThreeDS2Details, ThreeDS2FingerprintAction,
    ThreeDSActionHandlerResult,
};
use tracing::debug;

use super::core_handler::ThreeDS2CoreActionHandler;
use super::ports::FingerprintSubmitter;
use super::ThreeDS2ActionHandler;

/// Submits the fingerprint itself and returns whatever the backend answers:
/// a follow-up action or the finished result.
pub struct ThreeDS2CompactActionHandler {
    core: Arc<ThreeDS2CoreActionHandler>,
    submitter: Arc<dyn FingerprintSubmitter>,
}

impl ThreeDS2CompactActionHandler {
    /// Strategy that submits fingerprints through `submitter`.
    pub fn new(core: Arc<ThreeDS2CoreActionHandler>, submitter: Arc<dyn FingerprintSubmitter>) -> Self {
        Self { core, submitter }
    }
}

#[async_trait]
impl ThreeDS2ActionHandler for ThreeDS2CompactActionHandler {
    async fn handle_fingerprint(
        &self,
        action: &ThreeDS2FingerprintAction,
    ) -> Result<ThreeDSActionHandlerResult> {
        let fingerprint = self.core.fingerprint(action).await?;
        debug!("Submitting 3DS2 fingerprint");
        self.submitter.submit(&fingerprint, action.payment_data.as_deref()).await
    }

    async fn handle_challenge(
        &self,
        action: &ThreeDS2ChallengeAction,
    ) -> Result<ThreeDSActionHandlerResult> {
        let result = self.core.challenge(action).await?;
        Ok(ThreeDSActionHandlerResult::Details(ThreeDS2Details::Completed(result)))
    }
}
