//! Retry scheduling contract
//!
//! Implementations live in the infra crate (`SimpleScheduler`,
//! `BackoffScheduler`). The contract is callback shaped so a policy can run
//! the work inline, on a timer, or not at all.

/// Deferred work handed to a [`Scheduler`].
pub type ScheduledWork = Box<dyn FnOnce() + Send + 'static>;

/// Decides whether and when a retry attempt runs.
pub trait Scheduler: Send + Sync {
    /// Schedules `work` for attempt number `attempt_count`.
    ///
    /// Returns `true` when scheduling has terminated: `work` is dropped
    /// without running and the caller must treat its last result as final.
    /// Returns `false` when `work` has run, or will run later.
    fn schedule(&self, attempt_count: u32, work: ScheduledWork) -> bool;
}
