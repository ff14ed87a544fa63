//! Backoff scheduling
//!
//! Default cadence: attempts up to 20 wait 2s, up to 100 wait 10s, later
//! attempts never run. Scheduling terminates once the attempt count reaches
//! the attempt limit (100), so the last slot of the long tier is never used.

use std::sync::Arc;
use std::time::Duration;

use payflow_core::{ScheduledWork, Scheduler};
use payflow_domain::RetryConfig;
use tracing::{debug, warn};

/// Maps an attempt count to the delay before the next attempt.
pub trait IntervalCalculator: Send + Sync {
    /// `None` means the attempt must never run.
    fn interval(&self, attempt_count: u32) -> Option<Duration>;
}

/// Two-tier interval table.
#[derive(Debug, Clone)]
pub struct BackoffIntervalCalculator {
    short_interval: Duration,
    long_interval: Duration,
    short_attempt_limit: u32,
    long_attempt_limit: u32,
}

impl BackoffIntervalCalculator {
    /// Table built from the `[retry]` config section.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            short_interval: Duration::from_millis(config.short_interval_ms),
            long_interval: Duration::from_millis(config.long_interval_ms),
            short_attempt_limit: config.short_attempt_limit,
            long_attempt_limit: config.max_attempts,
        }
    }
}

impl Default for BackoffIntervalCalculator {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl IntervalCalculator for BackoffIntervalCalculator {
    fn interval(&self, attempt_count: u32) -> Option<Duration> {
        if attempt_count <= self.short_attempt_limit {
            Some(self.short_interval)
        } else if attempt_count <= self.long_attempt_limit {
            Some(self.long_interval)
        } else {
            None
        }
    }
}

/// Runs the work on the tokio timer after the calculated interval.
pub struct BackoffScheduler {
    calculator: Arc<dyn IntervalCalculator>,
    max_attempts: u32,
}

impl BackoffScheduler {
    /// Scheduler asking `calculator` for delays, up to `max_attempts`.
    pub fn new(calculator: Arc<dyn IntervalCalculator>, max_attempts: u32) -> Self {
        Self { calculator, max_attempts }
    }

    /// Scheduler for the `[retry]` config section.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(Arc::new(BackoffIntervalCalculator::from_config(config)), config.max_attempts)
    }
}

impl Default for BackoffScheduler {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl Scheduler for BackoffScheduler {
    fn schedule(&self, attempt_count: u32, work: ScheduledWork) -> bool {
        if attempt_count >= self.max_attempts {
            debug!(attempt_count, "Backoff attempt limit reached");
            return true;
        }
        let Some(delay) = self.calculator.interval(attempt_count) else {
            return true;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime to schedule a retry on, terminating");
            return true;
        };

        debug!(attempt_count, ?delay, "Scheduling retry");
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            work();
        });
        false
    }
}
