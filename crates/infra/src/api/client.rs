//! API client bound to one backend environment
//!
//! Performs exactly one HTTP request/response cycle per call. The
//! environment's headers and query items are applied first and the
//! request's own values override them.
//!
//! ## Response precedence
//! 1. A body that decodes as [`ApiErrorResponse`] is an [`ApiError::Api`],
//!    whatever the status.
//! 2. Any other non-2xx status is an [`ApiError::Http`].
//! 3. Otherwise the body decodes as the request's response type.

use std::sync::Arc;

use async_trait::async_trait;
use payflow_domain::{ApiEnvironment, ApiErrorResponse, HttpConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use super::errors::ApiError;
use super::request::Request;
use crate::http::HttpClient;
use crate::observability::{ActivityGuard, NetworkActivityObserver, NoopNetworkActivity};

/// Anything that can perform a typed [`Request`].
#[async_trait]
pub trait AnyApiClient: Send + Sync + 'static {
    /// Performs one request and decodes its response.
    async fn perform<R: Request>(&self, request: &R) -> Result<R::Response, ApiError>;
}

#[async_trait]
impl<C: AnyApiClient> AnyApiClient for Arc<C> {
    async fn perform<R: Request>(&self, request: &R) -> Result<R::Response, ApiError> {
        (**self).perform(request).await
    }
}

/// API client with environment defaults and network activity reporting
#[derive(Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    environment: ApiEnvironment,
    activity: Arc<dyn NetworkActivityObserver>,
}

impl ApiClient {
    /// Create a client for `environment` with a session built from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP session cannot be created
    pub fn new(environment: ApiEnvironment, config: &HttpConfig) -> Result<Self, ApiError> {
        Ok(Self::with_http_client(environment, HttpClient::from_config(config)?))
    }

    /// Client on top of a prepared HTTP session.
    pub fn with_http_client(environment: ApiEnvironment, http_client: HttpClient) -> Self {
        Self { http_client, environment, activity: Arc::new(NoopNetworkActivity) }
    }

    /// Reports every request to `activity`.
    #[must_use]
    pub fn with_activity_observer(mut self, activity: Arc<dyn NetworkActivityObserver>) -> Self {
        self.activity = activity;
        self
    }

    /// Base URL and defaults every request starts from.
    pub fn environment(&self) -> &ApiEnvironment {
        &self.environment
    }

    fn url_for<R: Request>(&self, request: &R) -> Result<Url, ApiError> {
        let mut base = self.environment.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base
            .join(request.path().trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid request path {}: {}", request.path(), e)))?;

        let mut query = self.environment.query_parameters.clone();
        query.extend(request.query_parameters());
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn headers_for<R: Request>(&self, request: &R) -> Result<HeaderMap, ApiError> {
        let mut merged = self.environment.headers.clone();
        merged.extend(request.headers());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in merged {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Config(format!("Invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ApiError::Config(format!("Invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn decode<R: Request>(status: StatusCode, url: &Url, body: &[u8]) -> Result<R::Response, ApiError> {
        if !body.is_empty() {
            if let Ok(error) = serde_json::from_slice::<ApiErrorResponse>(body) {
                return Err(ApiError::Api(error));
            }
        }

        if !status.is_success() {
            return Err(Self::map_status_error(status, url, body));
        }

        // Handle 204/205 and other empty bodies
        if body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "Empty response ({}), but response type cannot be deserialized from empty body",
                    status.as_u16()
                ))
            });
        }

        serde_json::from_slice(body)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response from {url}: {e}")))
    }

    fn map_status_error(status: StatusCode, url: &Url, body: &[u8]) -> ApiError {
        let body = String::from_utf8_lossy(body).into_owned();
        debug!(%url, %status, "non-success status without an error body");
        ApiError::Http { status: status.as_u16(), body }
    }
}

#[async_trait]
impl AnyApiClient for ApiClient {
    #[instrument(skip_all, fields(path = %request.path(), counter = request.counter()))]
    async fn perform<R: Request>(&self, request: &R) -> Result<R::Response, ApiError> {
        let url = self.url_for(request)?;
        let method = request.method();
        debug!(url = %url, %method, "API request");

        let mut builder = self.http_client.request(method.clone(), url.clone()).headers(self.headers_for(request)?);
        if method != Method::GET {
            let body = serde_json::to_vec(request)
                .map_err(|e| ApiError::Encode(format!("Failed to serialize body: {e}")))?;
            builder = builder.body(body);
        }

        let (status, body) = {
            let _activity = ActivityGuard::start(self.activity.clone());
            let response = self.http_client.send(builder).await?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::Transport(format!("Failed to read response body: {e}")))?;
            (status, body)
        };

        let result = Self::decode::<R>(status, &url, &body);
        if result.is_ok() {
            info!(%status, "API request successful");
        }
        result
    }
}
