//! Typed API client stack
//!
//! - [`ApiClient`]: one HTTP cycle per call, error bodies decoded first
//! - [`RetryApiClient`] / [`RetryOnErrorApiClient`]: repeat a request under
//!   a [`payflow_core::Scheduler`]
//! - [`UniqueAssetApiClient`]: single-flight fetch of a cacheable asset

mod client;
mod errors;
mod request;
mod retry;
mod unique_asset;

pub use client::{AnyApiClient, ApiClient};
pub use errors::{ApiError, ApiErrorCategory};
pub use request::Request;
pub use retry::{RetryApiClient, RetryOnErrorApiClient};
pub use unique_asset::UniqueAssetApiClient;
