//! Redirect component
//!
//! ## Flow
//! 1. `http(s)` URLs are first offered to an installed app as a universal
//!    link, then shown in the embedded browser.
//! 2. Custom-scheme URLs go straight to the OS; no taker is `AppNotFound`.
//! 3. The listener is always registered before the delegate hears about an
//!    external app, so a fast return cannot slip past.
//!
//! When the embedded browser goes away the app state is sampled after a
//! short delay. Still in the foreground means the shopper closed it
//! (`Cancelled`); in the background means another app took over. A return
//! URL that shows up before or during the sample wins outright.

use std::sync::Arc;
use std::time::Duration;

use payflow_domain::{
    ActionComponentData, PayflowError, RedirectAction, RedirectConfig, RedirectDetails, Result,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::listener::{RedirectListener, RegistrationId};
use super::ports::{
    AppLauncher, ApplicationStateProvider, BrowserComponent, BrowserEvent, PresentationDelegate,
};
use crate::component::{ActionComponentDelegate, ActionComponentKind, Completion};

/// Sends the shopper to a redirect URL and waits for the return URL.
pub struct RedirectComponent {
    listener: Arc<RedirectListener>,
    launcher: Arc<dyn AppLauncher>,
    app_state: Arc<dyn ApplicationStateProvider>,
    presenter: Option<Arc<dyn PresentationDelegate>>,
    delegate: Option<Arc<dyn ActionComponentDelegate>>,
    sample_delay: Duration,
    cancellation: CancellationToken,
}

impl RedirectComponent {
    /// Component with no presenter and no delegate yet.
    pub fn new(
        listener: Arc<RedirectListener>,
        launcher: Arc<dyn AppLauncher>,
        app_state: Arc<dyn ApplicationStateProvider>,
        config: &RedirectConfig,
    ) -> Self {
        Self {
            listener,
            launcher,
            app_state,
            presenter: None,
            delegate: None,
            sample_delay: Duration::from_millis(config.foreground_sample_delay_ms),
            cancellation: CancellationToken::new(),
        }
    }

    /// Enables the embedded browser for `http(s)` URLs.
    #[must_use]
    pub fn with_presentation_delegate(mut self, presenter: Arc<dyn PresentationDelegate>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Receiver of the outcome of [`Self::handle`].
    #[must_use]
    pub fn with_delegate(mut self, delegate: Arc<dyn ActionComponentDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Ties this component to an outer flow's cancellation.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Stops every redirect this component is waiting on. Final for the
    /// component: later actions resolve with `Cancelled` immediately.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Handles `action` and reports the outcome to the delegate.
    pub async fn handle(&self, action: RedirectAction) {
        let Some(delegate) = self.delegate.clone() else {
            warn!("Redirect handled without a delegate, outcome is dropped");
            return;
        };
        let completion = Completion::new(delegate.clone(), ActionComponentKind::Redirect);
        let notify = move || delegate.did_open_external_application(ActionComponentKind::Redirect);

        let outcome = self
            .await_return(&action, &notify)
            .await
            .map(|details| ActionComponentData::new(details, action.payment_data.clone()));
        completion.finish(outcome);
    }

    /// Runs the redirect and resolves with the details parsed from the
    /// return URL. `on_external_open` fires when another app took over.
    #[instrument(skip_all, fields(scheme = action.url.scheme()))]
    pub async fn await_return(
        &self,
        action: &RedirectAction,
        on_external_open: &(dyn Fn() + Send + Sync),
    ) -> Result<RedirectDetails> {
        let url = &action.url;
        let return_url = match url.scheme() {
            "http" | "https" => self.open_web_url(url, on_external_open).await?,
            _ => self.open_custom_scheme(url, on_external_open).await?,
        };
        info!("Redirect returned to the app");
        RedirectDetails::from_return_url(&return_url)
    }

    async fn open_web_url(
        &self,
        url: &Url,
        on_external_open: &(dyn Fn() + Send + Sync),
    ) -> Result<Url> {
        if self.launcher.open_universal_link(url).await {
            debug!("Universal link opened an installed app");
            let pending = PendingReturn::register(&self.listener);
            on_external_open();
            return self.wait_for_return(pending).await;
        }

        let Some(presenter) = self.presenter.clone() else {
            debug!("No presentation delegate, falling back to the system browser");
            return self.open_custom_scheme(url, on_external_open).await;
        };

        let pending = PendingReturn::register(&self.listener);
        let (browser, events) = BrowserComponent::new(url.clone());
        presenter.present(browser);
        let result = self.wait_in_browser(pending, events, on_external_open).await;
        if result.is_ok() {
            presenter.dismiss();
        }
        result
    }

    async fn open_custom_scheme(
        &self,
        url: &Url,
        on_external_open: &(dyn Fn() + Send + Sync),
    ) -> Result<Url> {
        if !self.launcher.open_url(url).await {
            return Err(PayflowError::AppNotFound);
        }
        let pending = PendingReturn::register(&self.listener);
        on_external_open();
        self.wait_for_return(pending).await
    }

    async fn wait_in_browser(
        &self,
        mut pending: PendingReturn<'_>,
        mut events: mpsc::UnboundedReceiver<BrowserEvent>,
        on_external_open: &(dyn Fn() + Send + Sync),
    ) -> Result<Url> {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => return Err(PayflowError::Cancelled),
            url = &mut pending.receiver => return returned(url),
            // a closed channel counts as a dismissal
            _ = events.recv() => {}
        }

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => return Err(PayflowError::Cancelled),
            url = &mut pending.receiver => return returned(url),
            () = tokio::time::sleep(self.sample_delay) => {}
        }

        if self.app_state.is_active() {
            debug!("Browser dismissed with the app in the foreground");
            return Err(PayflowError::Cancelled);
        }

        debug!("Browser dismissed while another app took over");
        on_external_open();
        self.wait_for_return(pending).await
    }

    async fn wait_for_return(&self, mut pending: PendingReturn<'_>) -> Result<Url> {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(PayflowError::Cancelled),
            url = &mut pending.receiver => returned(url),
        }
    }
}

/// Listener registration that is withdrawn when the wait ends without the
/// handler firing (cancellation, dismissal, or the flow being dropped).
struct PendingReturn<'a> {
    listener: &'a RedirectListener,
    id: RegistrationId,
    receiver: oneshot::Receiver<Url>,
}

impl<'a> PendingReturn<'a> {
    fn register(listener: &'a RedirectListener) -> Self {
        let (id, receiver) = listener.register_channel();
        Self { listener, id, receiver }
    }
}

impl Drop for PendingReturn<'_> {
    fn drop(&mut self) {
        self.listener.unregister(self.id);
    }
}

fn returned(url: std::result::Result<Url, oneshot::error::RecvError>) -> Result<Url> {
    // the sender only drops unfired when a newer redirect took the slot
    url.map_err(|_| PayflowError::Cancelled)
}
