//! Retrying API clients
//!
//! Every attempt goes through the wrapped client. After each attempt the
//! caller's predicate decides whether to go again; the [`Scheduler`] then
//! decides when, or whether scheduling has terminated. A terminated
//! scheduler ends the loop with the last attempt's result.

use std::sync::Arc;

use async_trait::async_trait;
use payflow_core::Scheduler;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::client::AnyApiClient;
use super::errors::ApiError;
use super::request::Request;

/// Repeats a request while the caller's predicate asks for it.
pub struct RetryApiClient<C> {
    inner: C,
    scheduler: Arc<dyn Scheduler>,
}

impl<C: AnyApiClient> RetryApiClient<C> {
    /// Retries `inner` on the cadence of `scheduler`.
    pub fn new(inner: C, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { inner, scheduler }
    }

    /// Performs `request` until `should_retry` says stop or the scheduler
    /// terminates.
    pub async fn perform<R, F>(&self, request: R, should_retry: F) -> Result<R::Response, ApiError>
    where
        R: Request,
        F: Fn(&Result<R::Response, ApiError>) -> bool + Send + Sync,
    {
        self.perform_until_cancelled(request, should_retry, &CancellationToken::new()).await
    }

    /// Like [`Self::perform`], but resolves with [`ApiError::Cancelled`] as
    /// soon as `cancel` fires, including while waiting for the next attempt.
    #[instrument(skip_all, fields(path = %request.path()))]
    pub async fn perform_until_cancelled<R, F>(
        &self,
        mut request: R,
        should_retry: F,
        cancel: &CancellationToken,
    ) -> Result<R::Response, ApiError>
    where
        R: Request,
        F: Fn(&Result<R::Response, ApiError>) -> bool + Send + Sync,
    {
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                result = self.inner.perform(&request) => result,
            };
            let attempts = request.counter() + 1;
            request.set_counter(attempts);

            if !should_retry(&result) {
                return result;
            }

            let (ready, scheduled) = oneshot::channel::<()>();
            let terminated = self.scheduler.schedule(
                attempts,
                Box::new(move || {
                    let _ = ready.send(());
                }),
            );
            if terminated {
                debug!(attempts, "Retry scheduling terminated, keeping last result");
                return result;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                scheduled = scheduled => {
                    if scheduled.is_err() {
                        // the scheduler dropped the work without running it
                        return result;
                    }
                }
            }
            debug!(attempts, "Retrying request");
        }
    }
}

/// Retries every failed attempt; a success ends the loop at once.
pub struct RetryOnErrorApiClient<C> {
    retry: RetryApiClient<C>,
}

impl<C: AnyApiClient> RetryOnErrorApiClient<C> {
    /// Retries failures of `inner` on the cadence of `scheduler`.
    pub fn new(inner: C, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { retry: RetryApiClient::new(inner, scheduler) }
    }
}

#[async_trait]
impl<C: AnyApiClient> AnyApiClient for RetryOnErrorApiClient<C> {
    async fn perform<R: Request>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.retry.perform(request.clone(), |result| result.is_err()).await
    }
}
