//! Await action: poll the payment status until the shopper finishes
//!
//! The status is asked again while the backend reports `pending` or
//! `received`, on the cadence of the retry client's scheduler. A single
//! failed status call is tolerated; a second one in a row ends the flow.
//! Whatever response ends the loop is handed to the delegate as
//! [`AwaitActionDetails`].

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use payflow_core::{ActionComponentDelegate, ActionComponentKind, Completion};
use payflow_domain::{
    ActionComponentData, AwaitAction, AwaitActionDetails, PayflowError, PollingConfig, Result,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::api::{AnyApiClient, ApiError, RetryApiClient};
use crate::requests::{PaymentStatusRequest, PaymentStatusResponse};

/// Polls the payment status for an await action.
pub struct PollingComponent<C> {
    client: RetryApiClient<C>,
    client_key: Option<String>,
    max_error_count: u32,
    delegate: Arc<dyn ActionComponentDelegate>,
    cancellation: CancellationToken,
}

impl<C: AnyApiClient> PollingComponent<C> {
    /// Component polling through `client` with `client_key`.
    pub fn new(
        client: RetryApiClient<C>,
        client_key: Option<String>,
        config: &PollingConfig,
        delegate: Arc<dyn ActionComponentDelegate>,
    ) -> Self {
        Self {
            client,
            client_key,
            max_error_count: config.max_error_count,
            delegate,
            cancellation: CancellationToken::new(),
        }
    }

    /// Stops polling with `Cancelled`. Final for the component.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Polls for `action`; the outcome reaches the delegate.
    pub async fn handle(&self, action: AwaitAction) {
        let completion = Completion::new(self.delegate.clone(), ActionComponentKind::Await);
        let outcome = self.poll(&action).await;
        if let Err(error) = &outcome {
            warn!(%error, "Await polling failed");
        }
        completion.finish(outcome);
    }

    #[instrument(skip_all, fields(payment_method = %action.payment_method_type))]
    async fn poll(&self, action: &AwaitAction) -> Result<ActionComponentData> {
        let client_key = self.client_key.as_deref().ok_or(PayflowError::MissingClientKey)?;
        let request = PaymentStatusRequest::new(action.payment_data.clone(), client_key);

        let consecutive_errors = AtomicU32::new(0);
        let should_retry = |result: &std::result::Result<PaymentStatusResponse, ApiError>| {
            match result {
                Ok(response) => {
                    consecutive_errors.store(0, Ordering::Relaxed);
                    response.result_code.is_pending()
                }
                Err(error) => {
                    let errors = consecutive_errors.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(%error, errors, "Payment status call failed");
                    errors <= self.max_error_count
                }
            }
        };

        let response = self
            .client
            .perform_until_cancelled(request, should_retry, &self.cancellation)
            .await?;
        info!(result_code = ?response.result_code, "Await polling finished");

        Ok(ActionComponentData::new(
            AwaitActionDetails { payload: response.payload },
            Some(action.payment_data.clone()),
        ))
    }
}
