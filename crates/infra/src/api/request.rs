//! Typed backend requests

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A request the [`super::AnyApiClient`] stack can perform.
///
/// The serialized form of the request is the JSON body (ignored for `GET`).
/// `counter` is the number of attempts already made; the retrying client
/// bumps it before every new attempt.
pub trait Request: Serialize + Clone + Send + Sync + 'static {
    type Response: DeserializeOwned + Send + 'static;

    /// Path relative to the environment's base URL.
    fn path(&self) -> String;

    /// HTTP method, `POST` unless overridden.
    fn method(&self) -> Method {
        Method::POST
    }

    /// Headers that override the environment's on collision.
    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Query items that override the environment's on collision.
    fn query_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Attempts made so far.
    fn counter(&self) -> u32;

    /// Records the attempts made so far.
    fn set_counter(&mut self, counter: u32);
}
