//! # Payflow Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP session and the typed API client stack (plain, retrying,
//!   single-flight)
//! - Retry schedulers (immediate-bounded and backoff)
//! - Backend requests and the fingerprint submitter
//! - Await polling, client public key lookup and the top-level action
//!   handler
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `payflow-core`
//! - Depends on `payflow-domain` and `payflow-core`
//! - Contains all "impure" code (network I/O, timers, files)

pub mod action_handler;
pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod polling;
pub mod public_key;
pub mod requests;
pub mod scheduling;
pub mod threeds2;

// Re-export commonly used items
pub use action_handler::{ActionHandler, PlatformHooks};
pub use api::{
    AnyApiClient, ApiClient, ApiError, ApiErrorCategory, Request, RetryApiClient,
    RetryOnErrorApiClient, UniqueAssetApiClient,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use polling::PollingComponent;
pub use public_key::PublicKeyProvider;
pub use scheduling::{BackoffIntervalCalculator, BackoffScheduler, IntervalCalculator, SimpleScheduler};
pub use threeds2::ApiFingerprintSubmitter;
