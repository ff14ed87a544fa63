//! Network activity tracking
//!
//! The API client reports every request it starts and finishes. The host
//! plugs in an observer, typically to drive a "network busy" indicator.
//!
//! ## Design
//! - Counters are atomics; `SeqCst` keeps `in_flight` and the transition
//!   callback consistent with each other
//! - [`ActivityGuard`] reports the finish on drop so cancelled requests are
//!   still balanced

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives a start and a finish for every HTTP cycle.
pub trait NetworkActivityObserver: Send + Sync {
    /// A request went out.
    fn request_started(&self);
    /// A request finished, whatever the outcome.
    fn request_finished(&self);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNetworkActivity;

impl NetworkActivityObserver for NoopNetworkActivity {
    fn request_started(&self) {}
    fn request_finished(&self) {}
}

type ActivityCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Counts requests and reports idle/busy transitions.
#[derive(Default)]
pub struct NetworkActivityCounter {
    in_flight: AtomicUsize,
    total: AtomicUsize,
    on_change: Option<ActivityCallback>,
}

impl NetworkActivityCounter {
    /// Idle counter with no callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// `callback(true)` fires when the first request starts, `callback(false)`
    /// when the last one finishes.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Requests currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Requests started since creation.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Whether any request is running.
    pub fn is_active(&self) -> bool {
        self.in_flight() > 0
    }
}

impl std::fmt::Debug for NetworkActivityCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkActivityCounter")
            .field("in_flight", &self.in_flight())
            .field("total", &self.total())
            .finish()
    }
}

impl NetworkActivityObserver for NetworkActivityCounter {
    fn request_started(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Some(callback) = &self.on_change {
                callback(true);
            }
        }
    }

    fn request_finished(&self) {
        let previous = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| count.checked_sub(1));
        if previous == Ok(1) {
            if let Some(callback) = &self.on_change {
                callback(false);
            }
        }
    }
}

/// Balances a `request_started` with a `request_finished` on drop.
pub struct ActivityGuard {
    observer: Arc<dyn NetworkActivityObserver>,
}

impl ActivityGuard {
    /// Reports a start to `observer`; the finish follows on drop.
    pub fn start(observer: Arc<dyn NetworkActivityObserver>) -> Self {
        observer.request_started();
        Self { observer }
    }
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.observer.request_finished();
    }
}
