//! Configuration management

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    BACKOFF_LONG_INTERVAL_MS, BACKOFF_MAX_ATTEMPTS, BACKOFF_SHORT_ATTEMPT_LIMIT,
    BACKOFF_SHORT_INTERVAL_MS, DEFAULT_HTTP_TIMEOUT_SECS, POLLING_MAX_ERROR_COUNT,
    REDIRECT_FOREGROUND_SAMPLE_DELAY_MS,
};
use crate::errors::PayflowError;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: ApiEnvironment,
    #[serde(default, skip_serializing)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub three_ds2: ThreeDS2Config,
}

impl Config {
    /// Defaults for everything but the environment.
    pub fn new(environment: ApiEnvironment) -> Self {
        Self {
            environment,
            client_key: None,
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            redirect: RedirectConfig::default(),
            polling: PollingConfig::default(),
            three_ds2: ThreeDS2Config::default(),
        }
    }
}

/// Where requests go, plus headers and query items added to every request.
///
/// Values a request sets itself win over these on key collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvironment {
    pub base_url: Url,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub query_parameters: BTreeMap<String, String>,
}

impl ApiEnvironment {
    /// Environment with no default headers or query items.
    pub fn new(base_url: Url) -> Self {
        Self { base_url, headers: BTreeMap::new(), query_parameters: BTreeMap::new() }
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query item sent with every request.
    #[must_use]
    pub fn with_query_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(name.into(), value.into());
        self
    }
}

/// HTTP session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS, user_agent: None }
    }
}

/// Backoff cadence for status polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub short_interval_ms: u64,
    pub long_interval_ms: u64,
    pub short_attempt_limit: u32,
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            short_interval_ms: BACKOFF_SHORT_INTERVAL_MS,
            long_interval_ms: BACKOFF_LONG_INTERVAL_MS,
            short_attempt_limit: BACKOFF_SHORT_ATTEMPT_LIMIT,
            max_attempts: BACKOFF_MAX_ATTEMPTS,
        }
    }
}

/// Redirect component configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// How long to wait after the in-app browser closes before checking
    /// whether the app is in the foreground.
    pub foreground_sample_delay_ms: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self { foreground_sample_delay_ms: REDIRECT_FOREGROUND_SAMPLE_DELAY_MS }
    }
}

/// Await (status polling) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub max_error_count: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { max_error_count: POLLING_MAX_ERROR_COUNT }
    }
}

/// 3DS2 configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreeDS2Config {
    #[serde(default)]
    pub flow: ThreeDS2Flow,
    /// Overrides the requestor app URL carried in challenge tokens.
    #[serde(default)]
    pub requestor_app_url: Option<Url>,
    #[serde(default)]
    pub appearance: AppearanceConfiguration,
}

/// Which handler serves the unified 3DS2 action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreeDS2Flow {
    /// Unified actions go compact, legacy ones go classic.
    #[default]
    ByEntryPoint,
    Compact,
    Classic,
}

impl FromStr for ThreeDS2Flow {
    type Err = PayflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by_entry_point" | "auto" => Ok(Self::ByEntryPoint),
            "compact" => Ok(Self::Compact),
            "classic" => Ok(Self::Classic),
            other => Err(PayflowError::Config(format!("Unknown 3DS2 flow: {other}"))),
        }
    }
}

/// Look of the challenge screens, passed through to the 3DS2 SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceConfiguration {
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub tint_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}
