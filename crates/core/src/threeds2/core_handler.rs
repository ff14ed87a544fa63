//! 3DS2 transaction lifecycle
//!
//! ## States
//! - idle: no transaction
//! - fingerprint ready: a transaction is stored and its fingerprint went out
//! - terminal / failed: the challenge resolved and the transaction is gone
//!
//! At most one transaction lives per handler. A challenge without one is
//! `MissingTransaction` and never reaches the SDK. Only one fingerprint or
//! challenge step may run at a time; a second concurrent call is rejected
//! with `TransactionInFlight`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use payflow_domain::{
    AppearanceConfiguration, ChallengeToken, Fingerprint, FingerprintToken, PayflowError, Result,
    ThreeDS2ChallengeAction, ThreeDS2FingerprintAction, ThreeDSResult,
};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::ports::{ThreeDSService, ThreeDSTransaction};

/// Owns the 3DS2 SDK transaction shared by both strategies.
pub struct ThreeDS2CoreActionHandler {
    service: Arc<dyn ThreeDSService>,
    appearance: AppearanceConfiguration,
    requestor_app_url: Option<Url>,
    transaction: Mutex<Option<Arc<dyn ThreeDSTransaction>>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a step ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| PayflowError::TransactionInFlight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ThreeDS2CoreActionHandler {
    /// Handler with default appearance and no app URL override.
    pub fn new(service: Arc<dyn ThreeDSService>) -> Self {
        Self {
            service,
            appearance: AppearanceConfiguration::default(),
            requestor_app_url: None,
            transaction: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Look of the challenge screens.
    #[must_use]
    pub fn with_appearance(mut self, appearance: AppearanceConfiguration) -> Self {
        self.appearance = appearance;
        self
    }

    /// Overrides the requestor app URL carried in challenge tokens.
    #[must_use]
    pub fn with_requestor_app_url(mut self, url: Option<Url>) -> Self {
        self.requestor_app_url = url;
        self
    }

    /// Whether a fingerprinted transaction awaits its challenge.
    pub fn has_transaction(&self) -> bool {
        self.transaction.lock().is_some()
    }

    /// Creates a transaction and returns its base64 fingerprint.
    ///
    /// An SDK error while creating the transaction is not a failure: it is
    /// encoded into the fingerprint so the backend can decide what follows.
    #[instrument(skip_all)]
    pub async fn fingerprint(&self, action: &ThreeDS2FingerprintAction) -> Result<String> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        if self.transaction.lock().take().is_some() {
            debug!("Discarding previous 3DS2 transaction");
        }

        let token = FingerprintToken::decode(&action.fingerprint_token)?;
        self.service
            .initialize(token.service_parameters(), &self.appearance)
            .await
            .map_err(PayflowError::Sdk)?;

        let fingerprint = match self.service.create_transaction(token.message_version()) {
            Ok(transaction) => {
                let fingerprint = Fingerprint::from_authentication_parameters(
                    &transaction.authentication_parameters(),
                    None,
                )?;
                *self.transaction.lock() = Some(transaction);
                info!(message_version = token.message_version(), "3DS2 transaction created");
                fingerprint
            }
            Err(sdk_error) => {
                warn!(domain = %sdk_error.domain, code = sdk_error.code, "Transaction creation failed, reporting it in the fingerprint");
                Fingerprint::from_sdk_error(&sdk_error)?
            }
        };
        fingerprint.encode()
    }

    /// Runs the challenge on the stored transaction. The transaction is
    /// released whatever the outcome.
    #[instrument(skip_all)]
    pub async fn challenge(&self, action: &ThreeDS2ChallengeAction) -> Result<ThreeDSResult> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let transaction = self.transaction.lock().take().ok_or(PayflowError::MissingTransaction)?;

        let token = ChallengeToken::decode(&action.challenge_token)?;
        let parameters = token.challenge_parameters(self.requestor_app_url.as_ref());
        let authorisation_token = action.authorisation_token.as_deref();

        match transaction.perform_challenge(parameters).await {
            (Some(result), _) => {
                info!(status = %result.transaction_status, "3DS2 challenge completed");
                ThreeDSResult::from_challenge_result(&result, authorisation_token)
            }
            (None, Some(sdk_error)) if sdk_error.is_challenge_cancelled() => {
                info!("3DS2 challenge cancelled by the shopper");
                Err(PayflowError::ChallengeCancelled(sdk_error))
            }
            (None, Some(sdk_error)) => {
                warn!(domain = %sdk_error.domain, code = sdk_error.code, "3DS2 challenge failed in the SDK, finishing with status U");
                ThreeDSResult::from_sdk_error(&sdk_error, authorisation_token)
            }
            (None, None) => Err(PayflowError::Unknown(
                "3DS2 SDK returned neither a result nor an error".to_string(),
            )),
        }
    }
}
