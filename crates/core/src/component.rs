//! Delegate contract shared by every action component

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use payflow_domain::{ActionComponentData, PayflowError};
use tracing::warn;

/// Which component produced a delegate callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionComponentKind {
    ThreeDS2,
    Redirect,
    Await,
}

impl fmt::Display for ActionComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ThreeDS2 => "threeDS2",
            Self::Redirect => "redirect",
            Self::Await => "await",
        };
        f.write_str(name)
    }
}

/// Receives the outcome of an action component.
///
/// For a single handled action exactly one of `did_provide` / `did_fail` is
/// called. `did_open_external_application` may precede it.
pub trait ActionComponentDelegate: Send + Sync {
    /// Delivers the terminal details of a handled action.
    fn did_provide(&self, data: ActionComponentData, from: ActionComponentKind);

    /// Delivers the terminal failure of a handled action.
    fn did_fail(&self, error: PayflowError, from: ActionComponentKind);

    /// Another app (or the system browser) took over the shopper.
    fn did_open_external_application(&self, _from: ActionComponentKind) {}
}

/// Delivers one terminal outcome to a delegate and swallows any later one.
pub struct Completion {
    delegate: Arc<dyn ActionComponentDelegate>,
    from: ActionComponentKind,
    done: AtomicBool,
}

impl Completion {
    /// Completion reporting to `delegate` on behalf of `from`.
    pub fn new(delegate: Arc<dyn ActionComponentDelegate>, from: ActionComponentKind) -> Self {
        Self { delegate, from, done: AtomicBool::new(false) }
    }

    /// Forwards `outcome` unless one was already delivered.
    pub fn finish(&self, outcome: Result<ActionComponentData, PayflowError>) {
        if self.done.swap(true, Ordering::AcqRel) {
            warn!(component = %self.from, "Dropping second terminal outcome");
            return;
        }
        match outcome {
            Ok(data) => self.delegate.did_provide(data, self.from),
            Err(error) => self.delegate.did_fail(error, self.from),
        }
    }
}
