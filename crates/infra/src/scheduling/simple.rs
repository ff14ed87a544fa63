use payflow_core::{ScheduledWork, Scheduler};

/// Runs the work immediately while `attempt_count < maximum_count`.
#[derive(Debug, Clone, Copy)]
pub struct SimpleScheduler {
    maximum_count: u32,
}

impl SimpleScheduler {
    /// Runs work at once until `maximum_count` attempts were made.
    pub fn new(maximum_count: u32) -> Self {
        Self { maximum_count }
    }
}

impl Scheduler for SimpleScheduler {
    fn schedule(&self, attempt_count: u32, work: ScheduledWork) -> bool {
        if attempt_count < self.maximum_count {
            work();
            false
        } else {
            true
        }
    }
}
