//! Public entry point of the 3DS2 flow
//!
//! The unified `threeDS2` action goes to the compact handler, the legacy
//! fingerprint/challenge entry points go to the classic one, unless
//! [`ThreeDS2Flow`] pins a single strategy. Follow-up actions are handled
//! in a loop until the flow produces details or fails; the delegate hears
//! about it exactly once. Only `redirect` and `threeDS2` may follow a step,
//! anything else ends the flow with `UnexpectedAction`.

use std::sync::Arc;

use payflow_domain::{
    Action, ActionComponentData, PayflowError, Result, ThreeDS2Action, ThreeDS2ChallengeAction,
    ThreeDS2Flow, ThreeDS2FingerprintAction, ThreeDSActionHandlerResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::classic::ThreeDS2ClassicActionHandler;
use super::compact::ThreeDS2CompactActionHandler;
use super::core_handler::ThreeDS2CoreActionHandler;
use super::ports::FingerprintSubmitter;
use super::ThreeDS2ActionHandler;
use crate::component::{ActionComponentDelegate, ActionComponentKind, Completion};
use crate::redirect::RedirectComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Classic,
    Compact,
}

enum Step {
    Fingerprint(ThreeDS2FingerprintAction),
    Challenge(ThreeDS2ChallengeAction),
}

impl Step {
    fn payment_data(&self) -> Option<&str> {
        match self {
            Self::Fingerprint(action) => action.payment_data.as_deref(),
            Self::Challenge(action) => action.payment_data.as_deref(),
        }
    }
}

impl From<ThreeDS2Action> for Step {
    fn from(action: ThreeDS2Action) -> Self {
        match action {
            ThreeDS2Action::Fingerprint(action) => Self::Fingerprint(action),
            ThreeDS2Action::Challenge(action) => Self::Challenge(action),
        }
    }
}

/// Public state machine for 3DS2 actions.
pub struct ThreeDS2Component {
    classic: Arc<dyn ThreeDS2ActionHandler>,
    compact: Arc<dyn ThreeDS2ActionHandler>,
    redirect: RedirectComponent,
    delegate: Arc<dyn ActionComponentDelegate>,
    flow: ThreeDS2Flow,
    cancellation: CancellationToken,
}

impl ThreeDS2Component {
    /// Builds both strategies on top of one shared core handler.
    pub fn new(
        core: Arc<ThreeDS2CoreActionHandler>,
        submitter: Arc<dyn FingerprintSubmitter>,
        redirect: RedirectComponent,
        delegate: Arc<dyn ActionComponentDelegate>,
    ) -> Self {
        let classic = Arc::new(ThreeDS2ClassicActionHandler::new(core.clone()));
        let compact = Arc::new(ThreeDS2CompactActionHandler::new(core, submitter));
        Self::with_handlers(classic, compact, redirect, delegate)
    }

    /// The redirect component is re-parented onto this component's
    /// cancellation token.
    pub fn with_handlers(
        classic: Arc<dyn ThreeDS2ActionHandler>,
        compact: Arc<dyn ThreeDS2ActionHandler>,
        redirect: RedirectComponent,
        delegate: Arc<dyn ActionComponentDelegate>,
    ) -> Self {
        let cancellation = CancellationToken::new();
        let redirect = redirect.with_cancellation_token(cancellation.child_token());
        Self {
            classic,
            compact,
            redirect,
            delegate,
            flow: ThreeDS2Flow::default(),
            cancellation,
        }
    }

    /// Pins the strategy instead of choosing it by entry point.
    #[must_use]
    pub fn with_flow(mut self, flow: ThreeDS2Flow) -> Self {
        self.flow = flow;
        self
    }

    /// Stops the running flow with `Cancelled`. Final for the component.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Unified entry point.
    pub async fn handle(&self, action: ThreeDS2Action) {
        self.run(action.into(), self.route_for(Route::Compact)).await;
    }

    /// Legacy fingerprint entry point.
    pub async fn handle_fingerprint(&self, action: ThreeDS2FingerprintAction) {
        self.run(Step::Fingerprint(action), self.route_for(Route::Classic)).await;
    }

    /// Legacy challenge entry point.
    pub async fn handle_challenge(&self, action: ThreeDS2ChallengeAction) {
        self.run(Step::Challenge(action), self.route_for(Route::Classic)).await;
    }

    fn route_for(&self, entry_point: Route) -> Route {
        match self.flow {
            ThreeDS2Flow::ByEntryPoint => entry_point,
            ThreeDS2Flow::Compact => Route::Compact,
            ThreeDS2Flow::Classic => Route::Classic,
        }
    }

    fn handler(&self, route: Route) -> &dyn ThreeDS2ActionHandler {
        match route {
            Route::Classic => self.classic.as_ref(),
            Route::Compact => self.compact.as_ref(),
        }
    }

    async fn run(&self, step: Step, route: Route) {
        let completion = Completion::new(self.delegate.clone(), ActionComponentKind::ThreeDS2);
        let span = info_span!("threeds2_flow", flow_id = %Uuid::new_v4(), ?route);

        let outcome = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(PayflowError::Cancelled),
            outcome = self.drive(step, route).instrument(span) => outcome,
        };
        if let Err(error) = &outcome {
            warn!(%error, "3DS2 flow failed");
        }
        completion.finish(outcome);
    }

    async fn drive(&self, mut step: Step, mut route: Route) -> Result<ActionComponentData> {
        loop {
            let payment_data = step.payment_data().map(str::to_owned);
            let handler = self.handler(route);
            let result = match &step {
                Step::Fingerprint(action) => handler.handle_fingerprint(action).await?,
                Step::Challenge(action) => handler.handle_challenge(action).await?,
            };

            let next = match result {
                ThreeDSActionHandlerResult::Details(details) => {
                    return Ok(ActionComponentData::new(details, payment_data));
                }
                ThreeDSActionHandlerResult::Action(action) => action,
            };
            debug!(kind = next.kind(), "3DS2 step returned a follow-up action");

            step = match next {
                Action::Redirect(redirect) => {
                    let delegate = self.delegate.clone();
                    let notify =
                        move || delegate.did_open_external_application(ActionComponentKind::ThreeDS2);
                    let details = self.redirect.await_return(&redirect, &notify).await?;
                    return Ok(ActionComponentData::new(
                        details,
                        redirect.payment_data.or(payment_data),
                    ));
                }
                Action::ThreeDS2(action) => action.into(),
                Action::ThreeDS2Fingerprint(_)
                | Action::ThreeDS2Challenge(_)
                | Action::Await(_) => return Err(PayflowError::UnexpectedAction),
            };
            route = self.route_for(Route::Compact);
        }
    }
}
