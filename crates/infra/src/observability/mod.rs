//! Observability hooks for the networking layer

mod network_activity;

pub use network_activity::{
    ActivityGuard, NetworkActivityCounter, NetworkActivityObserver, NoopNetworkActivity,
};
