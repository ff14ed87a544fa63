//! Single-slot listener for return URLs

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;
use url::Url;

type UrlHandler = Box<dyn FnOnce(Url) + Send + 'static>;

/// Identifies one registration so a flow can withdraw only its own handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationId(u64);

/// Holds at most one pending return-URL handler.
///
/// Registering replaces whatever was pending. The host shares one instance
/// between its URL-open callback and every redirecting component.
#[derive(Default)]
pub struct RedirectListener {
    slot: Mutex<Option<(RegistrationId, UrlHandler)>>,
    next_id: AtomicU64,
}

impl RedirectListener {
    /// Listener with no pending handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for the next return URL, replacing any pending one.
    pub fn register_for_url(&self, handler: impl FnOnce(Url) + Send + 'static) -> RegistrationId {
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if self.slot.lock().replace((id, Box::new(handler))).is_some() {
            debug!("Replacing pending redirect handler");
        }
        id
    }

    /// Registers a handler that forwards the URL into a channel.
    pub fn register_channel(&self) -> (RegistrationId, oneshot::Receiver<Url>) {
        let (sender, receiver) = oneshot::channel();
        let id = self.register_for_url(move |url| {
            let _ = sender.send(url);
        });
        (id, receiver)
    }

    /// Withdraws the handler registered as `id`, if it is still pending.
    pub fn unregister(&self, id: RegistrationId) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|(pending, _)| *pending == id) {
            *slot = None;
        }
    }

    /// Whether a return URL would currently be consumed.
    pub fn has_pending_handler(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Entry point for the host's URL-open callback. Fires and clears the
    /// pending handler; returns `false` when nothing was waiting.
    pub fn application_did_open(&self, url: &Url) -> bool {
        let pending = self.slot.lock().take();
        match pending {
            Some((_, handler)) => {
                handler(url.clone());
                true
            }
            None => false,
        }
    }
}
