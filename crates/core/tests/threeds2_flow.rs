//! Integration tests for the 3DS2 handlers and `ThreeDS2Component`
//!
//! **Coverage:**
//! - Transaction guard: challenge without fingerprint, concurrent steps
//! - SDK error handling: absorbed during fingerprint, classified during
//!   challenge
//! - Routing: legacy entry points go classic, unified goes compact, config
//!   can pin either
//! - Follow-up actions: nested challenge, redirect, unexpected await

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use payflow_core::{
    RedirectComponent, RedirectListener, ThreeDS2Component, ThreeDS2CoreActionHandler,
    ThreeDSService, ThreeDSTransaction,
};
use payflow_domain::utils::decode_base64_json;
use payflow_domain::{
    Action, ActionDetails, AppearanceConfiguration, PayflowError, RedirectAction,
    RedirectConfig, RedirectDetails, SdkError, ServiceParameters, ThreeDS2Action,
    ThreeDS2ChallengeAction, ThreeDS2Details, ThreeDS2FingerprintAction, ThreeDS2Flow,
    ThreeDSActionHandlerResult, ThreeDSResult,
};
use serde_json::{json, Value};
use support::{
    challenge_token, fingerprint_token, init_tracing, ChallengeOutcome, DelegateEvent,
    MockAppState, MockLauncher, MockSubmitter, MockThreeDSService, RecordingDelegate,
};
use tokio::sync::Notify;
use url::Url;

fn fingerprint_action(payment_data: Option<&str>) -> ThreeDS2FingerprintAction {
    ThreeDS2FingerprintAction {
        fingerprint_token: fingerprint_token(),
        authorisation_token: None,
        payment_data: payment_data.map(str::to_string),
    }
}

fn challenge_action(authorisation_token: Option<&str>) -> ThreeDS2ChallengeAction {
    ThreeDS2ChallengeAction {
        challenge_token: challenge_token(),
        authorisation_token: authorisation_token.map(str::to_string),
        payment_data: None,
    }
}

struct Harness {
    service: Arc<MockThreeDSService>,
    submitter: Arc<MockSubmitter>,
    delegate: Arc<RecordingDelegate>,
    listener: Arc<RedirectListener>,
    component: ThreeDS2Component,
}

fn harness(
    service: MockThreeDSService,
    submitter: MockSubmitter,
    launcher: MockLauncher,
) -> Harness {
    init_tracing();
    let service = Arc::new(service);
    let submitter = Arc::new(submitter);
    let delegate = Arc::new(RecordingDelegate::default());
    let listener = Arc::new(RedirectListener::new());
    let redirect = RedirectComponent::new(
        listener.clone(),
        Arc::new(launcher),
        Arc::new(MockAppState::new(true)),
        &RedirectConfig::default(),
    );
    let core = Arc::new(ThreeDS2CoreActionHandler::new(service.clone()));
    let component = ThreeDS2Component::new(core, submitter.clone(), redirect, delegate.clone());
    Harness { service, submitter, delegate, listener, component }
}

fn single_terminal(delegate: &RecordingDelegate) -> DelegateEvent {
    let events = delegate.terminal_events();
    assert_eq!(events.len(), 1, "expected exactly one terminal event, got {events:?}");
    events.into_iter().next().unwrap()
}

// ============================================================================
// Core handler
// ============================================================================

#[tokio::test]
async fn challenge_without_fingerprint_is_missing_transaction() {
    let service = Arc::new(MockThreeDSService::succeeding());
    let handler = ThreeDS2CoreActionHandler::new(service.clone());

    let err = handler.challenge(&challenge_action(None)).await.unwrap_err();

    assert_eq!(err, PayflowError::MissingTransaction);
    assert_eq!(service.challenge_calls(), 0);
}

#[tokio::test]
async fn transaction_creation_error_becomes_fingerprint_payload() {
    let sdk_error = SdkError::new("ThreeDS2SDK.RuntimeError", 1003, "unsupported version");
    let service = Arc::new(MockThreeDSService::failing_transaction(sdk_error.clone()));
    let handler = ThreeDS2CoreActionHandler::new(service);

    let encoded = handler.fingerprint(&fingerprint_action(None)).await.unwrap();

    let payload: Value = decode_base64_json(&encoded).unwrap();
    let object = payload.as_object().unwrap();
    assert_eq!(object.len(), 1, "only the SDK error should be present: {payload}");
    let inner: SdkError = decode_base64_json(object["threeDS2SDKError"].as_str().unwrap()).unwrap();
    assert_eq!(inner, sdk_error);
    assert!(!handler.has_transaction());
}

#[tokio::test]
async fn service_initialization_error_fails_the_step() {
    let mut service = MockThreeDSService::succeeding();
    service.initialize_error = Some(SdkError::new("ThreeDS2SDK.RuntimeError", 2, "bad key"));
    let handler = ThreeDS2CoreActionHandler::new(Arc::new(service));

    let err = handler.fingerprint(&fingerprint_action(None)).await.unwrap_err();

    assert!(matches!(err, PayflowError::Sdk(ref e) if e.code == 2));
    assert!(!handler.has_transaction());
}

#[tokio::test]
async fn malformed_token_fails_before_the_sdk() {
    let service = Arc::new(MockThreeDSService::succeeding());
    let handler = ThreeDS2CoreActionHandler::new(service.clone());
    let action = ThreeDS2FingerprintAction {
        fingerprint_token: "%%%".into(),
        authorisation_token: None,
        payment_data: None,
    };

    let err = handler.fingerprint(&action).await.unwrap_err();

    assert!(matches!(err, PayflowError::Decode(_)));
    assert_eq!(service.initialize_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fingerprint_then_challenge_produces_result_and_clears_transaction() {
    let service = Arc::new(MockThreeDSService::succeeding());
    let handler = ThreeDS2CoreActionHandler::new(service.clone());

    let encoded = handler.fingerprint(&fingerprint_action(None)).await.unwrap();
    let fingerprint: Value = decode_base64_json(&encoded).unwrap();
    assert_eq!(fingerprint["sdkTransID"], "sdk-trans");
    assert_eq!(fingerprint["sdkEphemPubKey"]["crv"], "P-256");
    assert!(handler.has_transaction());

    let parameters = service.last_service_parameters.lock().clone().unwrap();
    assert_eq!(parameters.directory_server_identifier, "F013371337");

    let result = handler.challenge(&challenge_action(Some("auth-token"))).await.unwrap();
    let payload = result.decode_payload().unwrap();
    assert_eq!(payload.trans_status.as_deref(), Some("Y"));
    assert_eq!(payload.authorisation_token.as_deref(), Some("auth-token"));
    assert!(!handler.has_transaction());

    let err = handler.challenge(&challenge_action(None)).await.unwrap_err();
    assert_eq!(err, PayflowError::MissingTransaction);
    assert_eq!(service.challenge_calls(), 1);
}

#[tokio::test]
async fn cancelled_challenge_fails_and_clears_transaction() {
    let service = Arc::new(MockThreeDSService::with_outcome(ChallengeOutcome::Error(
        SdkError::challenge_cancelled(),
    )));
    let handler = ThreeDS2CoreActionHandler::new(service);
    handler.fingerprint(&fingerprint_action(None)).await.unwrap();

    let err = handler.challenge(&challenge_action(None)).await.unwrap_err();

    assert!(matches!(err, PayflowError::ChallengeCancelled(_)));
    assert!(!handler.has_transaction());
}

#[tokio::test]
async fn other_challenge_errors_finish_with_unknown_status() {
    let sdk_error = SdkError::new("ThreeDS2SDK.RuntimeError", 5, "timeout");
    let service =
        Arc::new(MockThreeDSService::with_outcome(ChallengeOutcome::Error(sdk_error.clone())));
    let handler = ThreeDS2CoreActionHandler::new(service);
    handler.fingerprint(&fingerprint_action(None)).await.unwrap();

    let result = handler.challenge(&challenge_action(None)).await.unwrap();

    let payload = result.decode_payload().unwrap();
    assert_eq!(payload.trans_status.as_deref(), Some("U"));
    let inner: SdkError = decode_base64_json(&payload.three_ds2_sdk_error.unwrap()).unwrap();
    assert_eq!(inner, sdk_error);
    assert!(!handler.has_transaction());
}

#[tokio::test]
async fn challenge_without_result_or_error_is_unknown() {
    let service = Arc::new(MockThreeDSService::with_outcome(ChallengeOutcome::Nothing));
    let handler = ThreeDS2CoreActionHandler::new(service);
    handler.fingerprint(&fingerprint_action(None)).await.unwrap();

    let err = handler.challenge(&challenge_action(None)).await.unwrap_err();

    assert!(matches!(err, PayflowError::Unknown(_)));
}

#[tokio::test]
async fn configured_requestor_url_reaches_the_sdk() {
    let service = Arc::new(MockThreeDSService::succeeding());
    let app_url = Url::parse("https://merchant.example/3ds2").unwrap();
    let handler = ThreeDS2CoreActionHandler::new(service.clone())
        .with_requestor_app_url(Some(app_url.clone()));
    handler.fingerprint(&fingerprint_action(None)).await.unwrap();

    handler.challenge(&challenge_action(None)).await.unwrap();

    let parameters = service.last_challenge_parameters.lock().clone().unwrap();
    assert_eq!(parameters.three_ds_requestor_app_url, Some(app_url));
    assert_eq!(parameters.acs_transaction_id, "acs-trans-id");
}

/// Service whose initialization blocks until released.
struct GatedService {
    entered: Notify,
    release: Notify,
    released: AtomicBool,
}

#[async_trait]
impl ThreeDSService for GatedService {
    async fn initialize(
        &self,
        _parameters: ServiceParameters,
        _appearance: &AppearanceConfiguration,
    ) -> Result<(), SdkError> {
        self.entered.notify_one();
        if !self.released.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        Ok(())
    }

    fn create_transaction(
        &self,
        _message_version: &str,
    ) -> Result<Arc<dyn ThreeDSTransaction>, SdkError> {
        Err(SdkError::new("ThreeDS2SDK.RuntimeError", 1, "unavailable"))
    }
}

#[tokio::test]
async fn concurrent_step_is_rejected_while_one_is_in_flight() {
    let service = Arc::new(GatedService {
        entered: Notify::new(),
        release: Notify::new(),
        released: AtomicBool::new(false),
    });
    let handler = Arc::new(ThreeDS2CoreActionHandler::new(service.clone()));

    let first = tokio::spawn({
        let handler = handler.clone();
        async move { handler.fingerprint(&fingerprint_action(None)).await }
    });
    service.entered.notified().await;

    let second = handler.fingerprint(&fingerprint_action(None)).await;
    assert_eq!(second.unwrap_err(), PayflowError::TransactionInFlight);
    let challenge = handler.challenge(&challenge_action(None)).await;
    assert_eq!(challenge.unwrap_err(), PayflowError::TransactionInFlight);

    service.released.store(true, Ordering::SeqCst);
    service.release.notify_one();
    assert!(first.await.unwrap().is_ok());

    // guard released once the first step finished
    assert!(handler.fingerprint(&fingerprint_action(None)).await.is_ok());
}

// ============================================================================
// Component routing
// ============================================================================

#[tokio::test]
async fn legacy_fingerprint_action_goes_back_to_the_merchant_with_payment_data() {
    let h = harness(MockThreeDSService::succeeding(), MockSubmitter::new(vec![]), MockLauncher::new(false, false));
    let action: Action = serde_json::from_value(json!({
        "type": "threeDS2Fingerprint",
        "token": fingerprint_token(),
        "paymentData": "pd1"
    }))
    .unwrap();
    let Action::ThreeDS2Fingerprint(action) = action else { panic!("decoded {action:?}") };

    h.component.handle_fingerprint(action).await;

    let DelegateEvent::Provided(data, _) = single_terminal(&h.delegate) else {
        panic!("expected details, got {:?}", h.delegate.events());
    };
    assert_eq!(data.payment_data.as_deref(), Some("pd1"));
    let ActionDetails::ThreeDS2(ThreeDS2Details::Fingerprint(fingerprint)) = data.details else {
        panic!("unexpected details {:?}", data.details);
    };
    assert!(!fingerprint.is_empty());
    assert!(h.submitter.submissions.lock().is_empty());
}

#[tokio::test]
async fn compact_flow_submits_fingerprint_with_payment_data() {
    let completed = ThreeDSResult::new("done");
    let mut h = harness(
        MockThreeDSService::succeeding(),
        MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Details(
            ThreeDS2Details::Completed(completed.clone()),
        ))]),
        MockLauncher::new(false, false),
    );
    h.component = h.component.with_flow(ThreeDS2Flow::Compact);

    h.component.handle_fingerprint(fingerprint_action(Some("pd1"))).await;

    let submissions = h.submitter.submissions.lock().clone();
    assert_eq!(submissions.len(), 1);
    assert!(!submissions[0].0.is_empty());
    assert_eq!(submissions[0].1.as_deref(), Some("pd1"));

    let DelegateEvent::Provided(data, _) = single_terminal(&h.delegate) else {
        panic!("expected details, got {:?}", h.delegate.events());
    };
    assert_eq!(data.details, ActionDetails::ThreeDS2(ThreeDS2Details::Completed(completed)));
}

#[tokio::test]
async fn unified_action_follows_nested_challenge_to_completion() {
    let nested = Action::ThreeDS2(ThreeDS2Action::Challenge(challenge_action(Some("auth"))));
    let h = harness(
        MockThreeDSService::succeeding(),
        MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Action(nested))]),
        MockLauncher::new(false, false),
    );

    h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))).await;

    assert_eq!(h.service.challenge_calls(), 1);
    let DelegateEvent::Provided(data, _) = single_terminal(&h.delegate) else {
        panic!("expected details, got {:?}", h.delegate.events());
    };
    let ActionDetails::ThreeDS2(ThreeDS2Details::Completed(result)) = data.details else {
        panic!("unexpected details {:?}", data.details);
    };
    assert_eq!(result.decode_payload().unwrap().authorisation_token.as_deref(), Some("auth"));
    assert_eq!(data.payment_data, None);
}

#[tokio::test]
async fn classic_config_pins_unified_action_to_classic_handler() {
    let mut h = harness(MockThreeDSService::succeeding(), MockSubmitter::new(vec![]), MockLauncher::new(false, false));
    h.component = h.component.with_flow(ThreeDS2Flow::Classic);

    h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))).await;

    assert!(h.submitter.submissions.lock().is_empty());
    assert!(matches!(
        single_terminal(&h.delegate),
        DelegateEvent::Provided(data, _)
            if matches!(data.details, ActionDetails::ThreeDS2(ThreeDS2Details::Fingerprint(_)))
    ));
}

#[tokio::test]
async fn await_action_mid_flow_is_unexpected() {
    let unexpected = Action::Await(payflow_domain::AwaitAction {
        payment_data: "pd".into(),
        payment_method_type: "mbway".into(),
    });
    let h = harness(
        MockThreeDSService::succeeding(),
        MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Action(unexpected))]),
        MockLauncher::new(false, false),
    );

    h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))).await;

    assert!(matches!(
        single_terminal(&h.delegate),
        DelegateEvent::Failed(PayflowError::UnexpectedAction, _)
    ));
}

#[tokio::test]
async fn legacy_action_types_mid_flow_are_unexpected() {
    let follow_ups = [
        Action::ThreeDS2Challenge(challenge_action(Some("auth"))),
        Action::ThreeDS2Fingerprint(fingerprint_action(Some("pd"))),
    ];
    for unexpected in follow_ups {
        let h = harness(
            MockThreeDSService::succeeding(),
            MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Action(unexpected))]),
            MockLauncher::new(false, false),
        );

        h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))).await;

        assert!(matches!(
            single_terminal(&h.delegate),
            DelegateEvent::Failed(PayflowError::UnexpectedAction, _)
        ));
        assert_eq!(h.service.challenge_calls(), 0);
        assert_eq!(h.submitter.submissions.lock().len(), 1);
    }
}

#[tokio::test]
async fn legacy_challenge_without_fingerprint_fails_once() {
    let h = harness(MockThreeDSService::succeeding(), MockSubmitter::new(vec![]), MockLauncher::new(false, false));

    h.component.handle_challenge(challenge_action(None)).await;

    assert!(matches!(
        single_terminal(&h.delegate),
        DelegateEvent::Failed(PayflowError::MissingTransaction, _)
    ));
    assert_eq!(h.service.challenge_calls(), 0);
}

#[tokio::test]
async fn redirect_follow_up_is_handed_to_the_redirect_component() {
    let redirect = Action::Redirect(RedirectAction {
        url: Url::parse("bankapp://authorise?id=1").unwrap(),
        method: Some("GET".into()),
        payment_data: Some("redirect-pd".into()),
    });
    let h = harness(
        MockThreeDSService::succeeding(),
        MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Action(redirect))]),
        MockLauncher::new(false, true),
    );
    let return_url = Url::parse("myshop://return?redirectResult=xyz").unwrap();

    tokio::join!(
        h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))),
        async {
            h.delegate.external_opened.notified().await;
            assert!(h.listener.application_did_open(&return_url));
        }
    );

    let events = h.delegate.events();
    assert!(matches!(
        events[0],
        DelegateEvent::OpenedExternalApplication(payflow_core::ActionComponentKind::ThreeDS2)
    ));
    let DelegateEvent::Provided(data, from) = single_terminal(&h.delegate) else {
        panic!("expected details, got {events:?}");
    };
    assert_eq!(from, payflow_core::ActionComponentKind::ThreeDS2);
    assert_eq!(data.details, ActionDetails::Redirect(RedirectDetails::RedirectResult("xyz".into())));
    assert_eq!(data.payment_data.as_deref(), Some("redirect-pd"));
}

#[tokio::test]
async fn cancel_during_redirect_reports_cancelled_once() {
    let redirect = Action::Redirect(RedirectAction {
        url: Url::parse("bankapp://authorise").unwrap(),
        method: None,
        payment_data: None,
    });
    let h = harness(
        MockThreeDSService::succeeding(),
        MockSubmitter::new(vec![Ok(ThreeDSActionHandlerResult::Action(redirect))]),
        MockLauncher::new(false, true),
    );

    tokio::join!(
        h.component.handle(ThreeDS2Action::Fingerprint(fingerprint_action(None))),
        async {
            h.delegate.external_opened.notified().await;
            h.component.cancel();
        }
    );

    assert!(matches!(single_terminal(&h.delegate), DelegateEvent::Failed(PayflowError::Cancelled, _)));
    assert!(!h.listener.has_pending_handler());
}
