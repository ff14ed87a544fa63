//! Shared test helpers for `payflow-core` integration tests.
//!
//! In-memory mocks for every core port plus token fixtures, so flow tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use payflow_core::redirect::BrowserComponent;
use payflow_core::{
    ActionComponentDelegate, ActionComponentKind, AppLauncher, ApplicationStateProvider,
    FingerprintSubmitter, PresentationDelegate, ThreeDSService, ThreeDSTransaction,
};
use payflow_domain::utils::encode_base64_json;
use payflow_domain::{
    ActionComponentData, AppearanceConfiguration, AuthenticationRequestParameters,
    ChallengeParameters, ChallengeResult, PayflowError, Result as DomainResult, SdkError,
    ServiceParameters, ThreeDSActionHandlerResult,
};
use serde_json::json;
use tokio::sync::Notify;
use url::Url;

// ============================================================================
// Fixtures
// ============================================================================

pub fn fingerprint_token() -> String {
    encode_base64_json(&json!({
        "directoryServerId": "F013371337",
        "directoryServerPublicKey": "eyJrdHkiOiJSU0EifQ==",
        "threeDSMessageVersion": "2.1.0",
        "threeDSServerTransID": "server-trans-id"
    }))
    .unwrap()
}

pub fn challenge_token() -> String {
    encode_base64_json(&json!({
        "acsReferenceNumber": "ADYEN-ACS-SIMULATOR",
        "acsSignedContent": "signed",
        "acsTransID": "acs-trans-id",
        "acsURL": "https://acs.example/challenge",
        "messageVersion": "2.1.0",
        "threeDSServerTransID": "server-trans-id"
    }))
    .unwrap()
}

pub fn auth_parameters() -> AuthenticationRequestParameters {
    AuthenticationRequestParameters {
        device_information: "device-info".into(),
        sdk_ephemeral_public_key: r#"{"kty":"EC","crv":"P-256","x":"x","y":"y"}"#.into(),
        sdk_reference_number: "sdk-ref".into(),
        sdk_application_identifier: "sdk-app".into(),
        sdk_transaction_identifier: "sdk-trans".into(),
        message_version: "2.1.0".into(),
    }
}

// ============================================================================
// 3DS2 SDK
// ============================================================================

/// What the mock transaction answers when a challenge runs.
#[derive(Clone)]
pub enum ChallengeOutcome {
    Result(String),
    Error(SdkError),
    Nothing,
}

pub struct MockTransaction {
    outcome: ChallengeOutcome,
    pub challenge_calls: Arc<AtomicUsize>,
    pub last_parameters: Arc<Mutex<Option<ChallengeParameters>>>,
}

#[async_trait]
impl ThreeDSTransaction for MockTransaction {
    fn authentication_parameters(&self) -> AuthenticationRequestParameters {
        auth_parameters()
    }

    async fn perform_challenge(
        &self,
        parameters: ChallengeParameters,
    ) -> (Option<ChallengeResult>, Option<SdkError>) {
        self.challenge_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_parameters.lock() = Some(parameters);
        match &self.outcome {
            ChallengeOutcome::Result(status) => (
                Some(ChallengeResult {
                    sdk_transaction_identifier: "sdk-trans".into(),
                    transaction_status: status.clone(),
                }),
                None,
            ),
            ChallengeOutcome::Error(error) => (None, Some(error.clone())),
            ChallengeOutcome::Nothing => (None, None),
        }
    }
}

pub struct MockThreeDSService {
    pub initialize_error: Option<SdkError>,
    pub transaction_error: Option<SdkError>,
    pub outcome: ChallengeOutcome,
    pub initialize_calls: AtomicUsize,
    pub challenge_calls: Arc<AtomicUsize>,
    pub last_challenge_parameters: Arc<Mutex<Option<ChallengeParameters>>>,
    pub last_service_parameters: Mutex<Option<ServiceParameters>>,
}

impl MockThreeDSService {
    pub fn succeeding() -> Self {
        Self::with_outcome(ChallengeOutcome::Result("Y".into()))
    }

    pub fn with_outcome(outcome: ChallengeOutcome) -> Self {
        Self {
            initialize_error: None,
            transaction_error: None,
            outcome,
            initialize_calls: AtomicUsize::new(0),
            challenge_calls: Arc::new(AtomicUsize::new(0)),
            last_challenge_parameters: Arc::new(Mutex::new(None)),
            last_service_parameters: Mutex::new(None),
        }
    }

    pub fn failing_transaction(error: SdkError) -> Self {
        Self { transaction_error: Some(error), ..Self::succeeding() }
    }

    pub fn challenge_calls(&self) -> usize {
        self.challenge_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThreeDSService for MockThreeDSService {
    async fn initialize(
        &self,
        parameters: ServiceParameters,
        _appearance: &AppearanceConfiguration,
    ) -> Result<(), SdkError> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_service_parameters.lock() = Some(parameters);
        match &self.initialize_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn create_transaction(
        &self,
        _message_version: &str,
    ) -> Result<Arc<dyn ThreeDSTransaction>, SdkError> {
        if let Some(error) = &self.transaction_error {
            return Err(error.clone());
        }
        Ok(Arc::new(MockTransaction {
            outcome: self.outcome.clone(),
            challenge_calls: self.challenge_calls.clone(),
            last_parameters: self.last_challenge_parameters.clone(),
        }))
    }
}

// ============================================================================
// Fingerprint submitter
// ============================================================================

pub struct MockSubmitter {
    responses: Mutex<Vec<DomainResult<ThreeDSActionHandlerResult>>>,
    pub submissions: Mutex<Vec<(String, Option<String>)>>,
}

impl MockSubmitter {
    /// Answers each submission with the next response, in order.
    pub fn new(responses: Vec<DomainResult<ThreeDSActionHandlerResult>>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self { responses: Mutex::new(responses), submissions: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl FingerprintSubmitter for MockSubmitter {
    async fn submit(
        &self,
        fingerprint: &str,
        payment_data: Option<&str>,
    ) -> DomainResult<ThreeDSActionHandlerResult> {
        self.submissions.lock().push((fingerprint.to_string(), payment_data.map(str::to_string)));
        self.responses
            .lock()
            .pop()
            .unwrap_or_else(|| Err(PayflowError::Unknown("no scripted response".into())))
    }
}

// ============================================================================
// Delegate
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DelegateEvent {
    Provided(ActionComponentData, ActionComponentKind),
    Failed(PayflowError, ActionComponentKind),
    OpenedExternalApplication(ActionComponentKind),
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub events: Mutex<Vec<DelegateEvent>>,
    pub external_opened: Notify,
}

impl RecordingDelegate {
    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.lock().clone()
    }

    pub fn terminal_events(&self) -> Vec<DelegateEvent> {
        self.events()
            .into_iter()
            .filter(|event| !matches!(event, DelegateEvent::OpenedExternalApplication(_)))
            .collect()
    }
}

impl ActionComponentDelegate for RecordingDelegate {
    fn did_provide(&self, data: ActionComponentData, from: ActionComponentKind) {
        self.events.lock().push(DelegateEvent::Provided(data, from));
    }

    fn did_fail(&self, error: PayflowError, from: ActionComponentKind) {
        self.events.lock().push(DelegateEvent::Failed(error, from));
    }

    fn did_open_external_application(&self, from: ActionComponentKind) {
        self.events.lock().push(DelegateEvent::OpenedExternalApplication(from));
        self.external_opened.notify_one();
    }
}

// ============================================================================
// Platform
// ============================================================================

pub struct MockLauncher {
    pub universal_link_opens: bool,
    pub url_opens: bool,
    pub opened: Mutex<Vec<Url>>,
}

impl MockLauncher {
    pub fn new(universal_link_opens: bool, url_opens: bool) -> Self {
        Self { universal_link_opens, url_opens, opened: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl AppLauncher for MockLauncher {
    async fn open_universal_link(&self, url: &Url) -> bool {
        if self.universal_link_opens {
            self.opened.lock().push(url.clone());
        }
        self.universal_link_opens
    }

    async fn open_url(&self, url: &Url) -> bool {
        if self.url_opens {
            self.opened.lock().push(url.clone());
        }
        self.url_opens
    }
}

pub struct MockAppState {
    pub active: AtomicBool,
}

impl MockAppState {
    pub fn new(active: bool) -> Self {
        Self { active: AtomicBool::new(active) }
    }
}

impl ApplicationStateProvider for MockAppState {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MockPresenter {
    pub presented: Mutex<Option<BrowserComponent>>,
    pub presented_signal: Notify,
    pub dismissed: AtomicBool,
}

impl PresentationDelegate for MockPresenter {
    fn present(&self, component: BrowserComponent) {
        *self.presented.lock() = Some(component);
        self.presented_signal.notify_one();
    }

    fn dismiss(&self) {
        self.dismissed.store(true, Ordering::SeqCst);
    }
}

/// Route flow logs to the test writer; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("payflow_core=debug")
        .try_init();
}
