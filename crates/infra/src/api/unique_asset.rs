//! Single-flight client for a cacheable asset
//!
//! Concurrent callers share one in-flight request. A success is cached and
//! returned to every later caller without touching the network; a failure
//! is delivered to everyone waiting on that flight and is not cached, so
//! the next caller fetches again. Waiters hear back in the order they
//! asked.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use super::client::AnyApiClient;
use super::errors::ApiError;
use super::request::Request;

type Waiter<T> = oneshot::Sender<Result<T, ApiError>>;

struct AssetState<T> {
    cached: Option<T>,
    waiting: Vec<Waiter<T>>,
}

/// Shares one fetch of an asset between every caller and caches it.
pub struct UniqueAssetApiClient<C, T> {
    inner: Arc<C>,
    state: Arc<Mutex<AssetState<T>>>,
}

impl<C, T> UniqueAssetApiClient<C, T>
where
    C: AnyApiClient,
    T: Clone + Send + 'static,
{
    /// Client with nothing cached yet.
    pub fn new(inner: C) -> Self {
        Self::from_shared(Arc::new(inner))
    }

    /// Like [`Self::new`] for a client shared elsewhere.
    pub fn from_shared(inner: Arc<C>) -> Self {
        Self { inner, state: Arc::new(Mutex::new(AssetState { cached: None, waiting: Vec::new() })) }
    }

    /// The asset, once a fetch succeeded.
    pub fn cached(&self) -> Option<T> {
        self.state.lock().cached.clone()
    }

    /// Returns the cached asset, or joins (or starts) the flight fetching it.
    ///
    /// The flight runs on its own task, so a caller giving up does not strand
    /// the others.
    pub async fn perform<R>(&self, request: R) -> Result<T, ApiError>
    where
        R: Request<Response = T>,
    {
        let (receiver, first) = {
            let mut state = self.state.lock();
            if let Some(cached) = &state.cached {
                return Ok(cached.clone());
            }
            let (sender, receiver) = oneshot::channel();
            state.waiting.push(sender);
            (receiver, state.waiting.len() == 1)
        };

        if first {
            debug!(path = %request.path(), "Fetching unique asset");
            let inner = self.inner.clone();
            let state = self.state.clone();
            tokio::spawn(async move {
                let result = inner.perform(&request).await;
                let waiting = {
                    let mut state = state.lock();
                    if let Ok(asset) = &result {
                        state.cached = Some(asset.clone());
                    }
                    std::mem::take(&mut state.waiting)
                };
                for waiter in waiting {
                    let _ = waiter.send(result.clone());
                }
            });
        }

        receiver.await.unwrap_or(Err(ApiError::Cancelled))
    }
}
