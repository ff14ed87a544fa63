//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `PAYFLOW_BASE_URL` is missing or a value is invalid, falls back to
//!    loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The client key is a secret: when `PAYFLOW_CLIENT_KEY` is set it wins
//! over whatever a file says.
//!
//! ## Environment Variables
//! - `PAYFLOW_BASE_URL`: Backend base URL (required)
//! - `PAYFLOW_CLIENT_KEY`: Client key sent with shopper-facing requests
//! - `PAYFLOW_HTTP_TIMEOUT_SECS`: HTTP timeout in seconds
//! - `PAYFLOW_REDIRECT_SAMPLE_DELAY_MS`: Delay before sampling the app state
//!   after the in-app browser closes
//! - `PAYFLOW_THREEDS2_FLOW`: `by_entry_point`, `compact` or `classic`
//! - `PAYFLOW_THREEDS2_REQUESTOR_APP_URL`: Requestor app URL override
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./payflow.{toml,json}` or `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use payflow_domain::{ApiEnvironment, Config, PayflowError, Result, ThreeDS2Flow};
use url::Url;

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["payflow.toml", "payflow.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `PayflowError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `PAYFLOW_BASE_URL` is required; everything else falls back to the
/// defaults.
///
/// # Errors
/// Returns `PayflowError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("PAYFLOW_BASE_URL").and_then(|s| {
        Url::parse(&s).map_err(|e| PayflowError::Config(format!("Invalid base URL: {e}")))
    })?;

    let mut config = Config::new(ApiEnvironment::new(base_url));
    config.client_key = optional_env_var("PAYFLOW_CLIENT_KEY");

    if let Some(timeout) = env_parse::<u64>("PAYFLOW_HTTP_TIMEOUT_SECS")? {
        config.http.timeout_secs = timeout;
    }
    if let Some(delay) = env_parse::<u64>("PAYFLOW_REDIRECT_SAMPLE_DELAY_MS")? {
        config.redirect.foreground_sample_delay_ms = delay;
    }
    if let Some(flow) = optional_env_var("PAYFLOW_THREEDS2_FLOW") {
        config.three_ds2.flow = ThreeDS2Flow::from_str(&flow)?;
    }
    if let Some(url) = optional_env_var("PAYFLOW_THREEDS2_REQUESTOR_APP_URL") {
        let url = Url::parse(&url)
            .map_err(|e| PayflowError::Config(format!("Invalid requestor app URL: {e}")))?;
        config.three_ds2.requestor_app_url = Some(url);
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PayflowError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PayflowError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PayflowError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    let mut config = parse_config(&contents, &config_path)?;
    if let Some(client_key) = optional_env_var("PAYFLOW_CLIENT_KEY") {
        config.client_key = Some(client_key);
    }
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `PayflowError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from)?,
        "json" => serde_json::from_str(contents).map_err(InfraError::from)?,
        _ => {
            return Err(PayflowError::Config(format!("Unsupported config format: {extension}")))
        }
    };
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `PayflowError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| PayflowError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional variable; empty values count as unset.
fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_env_var(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| PayflowError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
