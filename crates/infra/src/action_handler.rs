//! Top-level dispatcher for backend actions
//!
//! Routes each [`Action`] to the component that owns it:
//! - `redirect` → [`RedirectComponent`]
//! - `threeDS2` → [`ThreeDS2Component::handle`]
//! - `threeDS2Fingerprint` / `threeDS2Challenge` → the legacy entry points
//! - `await` → [`PollingComponent`]
//!
//! Every outcome reaches the shared delegate.

use std::sync::Arc;

use payflow_core::{
    ActionComponentDelegate, AppLauncher, ApplicationStateProvider, PresentationDelegate,
    RedirectComponent, RedirectListener, ThreeDS2Component, ThreeDS2CoreActionHandler,
    ThreeDSService,
};
use payflow_domain::{Action, Config, Result};
use tracing::{info, instrument};

use crate::api::{AnyApiClient, ApiClient, RetryApiClient};
use crate::observability::NetworkActivityObserver;
use crate::polling::PollingComponent;
use crate::scheduling::BackoffScheduler;
use crate::threeds2::ApiFingerprintSubmitter;

/// Host-provided collaborators.
pub struct PlatformHooks {
    pub listener: Arc<RedirectListener>,
    pub launcher: Arc<dyn AppLauncher>,
    pub app_state: Arc<dyn ApplicationStateProvider>,
    pub presenter: Option<Arc<dyn PresentationDelegate>>,
    pub three_ds_service: Arc<dyn ThreeDSService>,
    pub network_activity: Option<Arc<dyn NetworkActivityObserver>>,
}

impl PlatformHooks {
    fn redirect_component(&self, config: &Config) -> RedirectComponent {
        let component = RedirectComponent::new(
            self.listener.clone(),
            self.launcher.clone(),
            self.app_state.clone(),
            &config.redirect,
        );
        match &self.presenter {
            Some(presenter) => component.with_presentation_delegate(presenter.clone()),
            None => component,
        }
    }
}

/// Routes backend actions to their components.
pub struct ActionHandler<C = ApiClient> {
    redirect: RedirectComponent,
    three_ds2: ThreeDS2Component,
    polling: PollingComponent<C>,
}

impl ActionHandler<ApiClient> {
    /// Wires every component for `config` on top of one API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP session cannot be created
    pub fn from_config(
        config: &Config,
        platform: PlatformHooks,
        delegate: Arc<dyn ActionComponentDelegate>,
    ) -> Result<Self> {
        let mut api = ApiClient::new(config.environment.clone(), &config.http)?;
        if let Some(observer) = &platform.network_activity {
            api = api.with_activity_observer(observer.clone());
        }

        let redirect = platform.redirect_component(config).with_delegate(delegate.clone());

        let core = ThreeDS2CoreActionHandler::new(platform.three_ds_service.clone())
            .with_appearance(config.three_ds2.appearance.clone())
            .with_requestor_app_url(config.three_ds2.requestor_app_url.clone());
        let submitter = ApiFingerprintSubmitter::new(api.clone(), config.client_key.clone());
        let three_ds2 = ThreeDS2Component::new(
            Arc::new(core),
            Arc::new(submitter),
            platform.redirect_component(config),
            delegate.clone(),
        )
        .with_flow(config.three_ds2.flow);

        let polling = PollingComponent::new(
            RetryApiClient::new(api, Arc::new(BackoffScheduler::from_config(&config.retry))),
            config.client_key.clone(),
            &config.polling,
            delegate,
        );

        info!(flow = ?config.three_ds2.flow, "Action handler ready");
        Ok(Self::new(redirect, three_ds2, polling))
    }
}

impl<C: AnyApiClient> ActionHandler<C> {
    /// Handler over already built components.
    pub fn new(
        redirect: RedirectComponent,
        three_ds2: ThreeDS2Component,
        polling: PollingComponent<C>,
    ) -> Self {
        Self { redirect, three_ds2, polling }
    }

    /// Handles `action`; the outcome reaches the delegate.
    #[instrument(skip_all, fields(kind = action.kind()))]
    pub async fn perform(&self, action: Action) {
        match action {
            Action::Redirect(action) => self.redirect.handle(action).await,
            Action::ThreeDS2(action) => self.three_ds2.handle(action).await,
            Action::ThreeDS2Fingerprint(action) => self.three_ds2.handle_fingerprint(action).await,
            Action::ThreeDS2Challenge(action) => self.three_ds2.handle_challenge(action).await,
            Action::Await(action) => self.polling.handle(action).await,
        }
    }

    /// Cancels every component. Final for the handler.
    pub fn cancel(&self) {
        self.redirect.cancel();
        self.three_ds2.cancel();
        self.polling.cancel();
    }
}
