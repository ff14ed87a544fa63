//! Classic 3DS2 flow: every step goes back to the caller

use std::sync::Arc;

use async_trait::async_trait;
use payflow_domain::{
    Result, ThreeDS2ChallengeAction, ThreeDS2Details, ThreeDS2FingerprintAction,
    ThreeDSActionHandlerResult,
};

use super::core_handler::ThreeDS2CoreActionHandler;
use super::ThreeDS2ActionHandler;

/// Hands the fingerprint back as details; the merchant submits it and
/// receives the challenge in its own round trip.
pub struct ThreeDS2ClassicActionHandler {
    core: Arc<ThreeDS2CoreActionHandler>,
}

impl ThreeDS2ClassicActionHandler {
    /// Strategy on top of a shared core handler.
    pub fn new(core: Arc<ThreeDS2CoreActionHandler>) -> Self {
        Self { core }
    }
}

#[async_trait]
impl ThreeDS2ActionHandler for ThreeDS2ClassicActionHandler {
    async fn handle_fingerprint(
        &self,
        action: &ThreeDS2FingerprintAction,
    ) -> Result<ThreeDSActionHandlerResult> {
        let fingerprint = self.core.fingerprint(action).await?;
        Ok(ThreeDSActionHandlerResult::Details(ThreeDS2Details::Fingerprint(fingerprint)))
    }

    async fn handle_challenge(
        &self,
        action: &ThreeDS2ChallengeAction,
    ) -> Result<ThreeDSActionHandlerResult> {
        let result = self.core.challenge(action).await?;
        Ok(ThreeDSActionHandlerResult::Details(ThreeDS2Details::ChallengeResult(result)))
    }
}
