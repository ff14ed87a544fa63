//! 3DS2 authentication flows
//!
//! [`ThreeDS2CoreActionHandler`] owns the SDK transaction. The classic and
//! compact handlers share one core and differ only in who submits the
//! fingerprint. [`ThreeDS2Component`] routes actions between them.

pub mod classic;
pub mod compact;
pub mod component;
pub mod core_handler;
pub mod ports;

use async_trait::async_trait;
use payflow_domain::{
    Result, ThreeDS2ChallengeAction, ThreeDS2FingerprintAction, ThreeDSActionHandlerResult,
};

pub use classic::ThreeDS2ClassicActionHandler;
pub use compact::ThreeDS2CompactActionHandler;
pub use component::ThreeDS2Component;
pub use core_handler::ThreeDS2CoreActionHandler;

/// One 3DS2 orchestration strategy.
#[async_trait]
pub trait ThreeDS2ActionHandler: Send + Sync {
    /// Handles a fingerprint step.
    async fn handle_fingerprint(
        &self,
        action: &ThreeDS2FingerprintAction,
    ) -> Result<ThreeDSActionHandlerResult>;

    /// Handles a challenge step.
    async fn handle_challenge(
        &self,
        action: &ThreeDS2ChallengeAction,
    ) -> Result<ThreeDSActionHandlerResult>;
}
