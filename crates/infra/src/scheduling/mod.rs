//! Retry schedulers
//!
//! Implementations of [`payflow_core::Scheduler`]:
//! - [`SimpleScheduler`]: runs the work inline up to a fixed attempt count
//! - [`BackoffScheduler`]: runs the work after a delay that grows with the
//!   attempt count, until a hard attempt limit

mod backoff;
mod simple;

pub use backoff::{BackoffIntervalCalculator, BackoffScheduler, IntervalCalculator};
pub use simple::SimpleScheduler;
