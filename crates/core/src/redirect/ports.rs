//! Port interfaces for the host platform

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

/// Opens URLs outside the app.
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Opens `url` only if an installed app claims it as a universal link.
    async fn open_universal_link(&self, url: &Url) -> bool;

    /// Hands `url` to the OS (custom schemes, or the system browser).
    async fn open_url(&self, url: &Url) -> bool;
}

/// Reports whether the host app is currently in the foreground.
pub trait ApplicationStateProvider: Send + Sync {
    /// `true` while the app is in the foreground.
    fn is_active(&self) -> bool;
}

/// Shows the embedded browser on the host's view hierarchy.
pub trait PresentationDelegate: Send + Sync {
    /// Shows `component` to the shopper.
    fn present(&self, component: BrowserComponent);

    /// Called once the return URL arrived while the browser was up.
    fn dismiss(&self) {}
}

/// What happened to a presented browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserEvent {
    Dismissed,
}

/// Handle to an in-app browser session, given to the presentation delegate.
#[derive(Debug, Clone)]
pub struct BrowserComponent {
    url: Url,
    events: mpsc::UnboundedSender<BrowserEvent>,
}

impl BrowserComponent {
    pub(crate) fn new(url: Url) -> (Self, mpsc::UnboundedReceiver<BrowserEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { url, events }, receiver)
    }

    /// Page the browser should load.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The browser went away, by the shopper closing it or by the OS
    /// switching to another app.
    pub fn did_dismiss(&self) {
        // receiver gone means the redirect already finished
        let _ = self.events.send(BrowserEvent::Dismissed);
    }
}
