//! Shared helpers for `payflow-infra` integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use payflow_core::{
    ActionComponentDelegate, ActionComponentKind, AppLauncher, ApplicationStateProvider,
    ThreeDSService, ThreeDSTransaction,
};
use payflow_domain::utils::encode_base64_json;
use payflow_domain::{
    ActionComponentData, AppearanceConfiguration, AuthenticationRequestParameters,
    ChallengeParameters, ChallengeResult, PayflowError, SdkError, ServiceParameters,
};
use payflow_infra::{AnyApiClient, ApiError, Request};
use serde_json::{json, Value};
use tokio::sync::Notify;
use url::Url;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// API client
// ============================================================================

/// Answers requests from a script. The last entry repeats once the script
/// runs out.
pub struct ScriptedApiClient {
    script: Mutex<VecDeque<Result<Value, ApiError>>>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub counters: Mutex<Vec<u32>>,
}

impl ScriptedApiClient {
    pub fn new(script: Vec<Result<Value, ApiError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            counters: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<Value, ApiError> {
        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().expect("script entry")
        } else {
            script.front().cloned().expect("script must not be empty")
        }
    }
}

#[async_trait]
impl AnyApiClient for ScriptedApiClient {
    async fn perform<R: Request>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.counters.lock().push(request.counter());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let value = self.next()?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

pub fn status(result_code: &str, payload: &str) -> Result<Value, ApiError> {
    Ok(json!({ "resultCode": result_code, "payload": payload }))
}

pub fn server_error() -> Result<Value, ApiError> {
    Err(ApiError::Http { status: 500, body: String::new() })
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
    events: Mutex<Vec<DelegateEvent>>,
    pub external_opened: Notify,
}

impl RecordingDelegate {
    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.lock().clone()
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
    universal_links: bool,
    custom_schemes: bool,
}

impl MockLauncher {
    pub fn new(universal_links: bool, custom_schemes: bool) -> Self {
        Self { universal_links, custom_schemes }
    }
}

#[async_trait]
impl AppLauncher for MockLauncher {
    async fn open_universal_link(&self, _url: &Url) -> bool {
        self.universal_links
    }

    async fn open_url(&self, _url: &Url) -> bool {
        self.custom_schemes
    }
}

pub struct ForegroundApp;

impl ApplicationStateProvider for ForegroundApp {
    fn is_active(&self) -> bool {
        true
    }
}

// ============================================================================
// 3DS2 SDK
// ============================================================================

pub fn fingerprint_token() -> String {
    encode_base64_json(&json!({
        "directoryServerId": "F013371337",
        "directoryServerPublicKey": "eyJrdHkiOiJSU0EifQ==",
        "threeDSMessageVersion": "2.1.0"
    }))
    .unwrap()
}

pub struct StubTransaction;

#[async_trait]
impl ThreeDSTransaction for StubTransaction {
    fn authentication_parameters(&self) -> AuthenticationRequestParameters {
        AuthenticationRequestParameters {
            device_information: "device-info".into(),
            sdk_ephemeral_public_key: r#"{"kty":"EC","crv":"P-256","x":"x","y":"y"}"#.into(),
            sdk_reference_number: "sdk-ref".into(),
            sdk_application_identifier: "sdk-app".into(),
            sdk_transaction_identifier: "sdk-trans".into(),
            message_version: "2.1.0".into(),
        }
    }

    async fn perform_challenge(
        &self,
        _parameters: ChallengeParameters,
    ) -> (Option<ChallengeResult>, Option<SdkError>) {
        let result = ChallengeResult {
            sdk_transaction_identifier: "sdk-trans".into(),
            transaction_status: "Y".into(),
        };
        (Some(result), None)
    }
}

#[derive(Default)]
pub struct StubThreeDSService;

#[async_trait]
impl ThreeDSService for StubThreeDSService {
    async fn initialize(
        &self,
        _parameters: ServiceParameters,
        _appearance: &AppearanceConfiguration,
    ) -> Result<(), SdkError> {
        Ok(())
    }

    fn create_transaction(
        &self,
        _message_version: &str,
    ) -> Result<Arc<dyn ThreeDSTransaction>, SdkError> {
        Ok(Arc::new(StubTransaction))
    }
}
