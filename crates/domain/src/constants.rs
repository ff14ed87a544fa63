//! Domain-level constants
//!
//! Backend paths, retry cadence and 3DS2 protocol values live here so the
//! core and infra crates agree on them.

// Backend paths, relative to the environment base URL
/// Compact flow fingerprint submission.
pub const SUBMIT_FINGERPRINT_PATH: &str = "checkoutshopper/v1/submitThreeDS2Fingerprint";
/// Await action status polling.
pub const PAYMENT_STATUS_PATH: &str = "checkoutshopper/services/PaymentInitiation/v1/status";
/// Client public key lookup, followed by `/<client key>`.
pub const CLIENT_KEY_PATH: &str = "checkoutshopper/v1/clientKeys";

/// Query parameter that carries the client key.
pub const CLIENT_KEY_QUERY_ITEM: &str = "token";

// Backoff cadence for long-running status polling
/// Delay for attempts in the short tier.
pub const BACKOFF_SHORT_INTERVAL_MS: u64 = 2_000;
/// Delay for attempts past the short tier.
pub const BACKOFF_LONG_INTERVAL_MS: u64 = 10_000;
/// Last attempt of the short tier.
pub const BACKOFF_SHORT_ATTEMPT_LIMIT: u32 = 20;
/// Attempt count at which scheduling terminates.
pub const BACKOFF_MAX_ATTEMPTS: u32 = 100;

/// Failed status calls in a row that polling tolerates.
pub const POLLING_MAX_ERROR_COUNT: u32 = 1;

/// Wait before sampling the app state once the browser went away.
pub const REDIRECT_FOREGROUND_SAMPLE_DELAY_MS: u64 = 1_000;

// HTTP defaults
/// Whole-request timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Sent when the config names no user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("payflow/", env!("CARGO_PKG_VERSION"));

// 3DS2 protocol values
/// `transStatus` of a challenge the SDK could not finish.
pub const THREEDS2_TRANS_STATUS_UNKNOWN: &str = "U";
/// Used when a fingerprint token names no version.
pub const THREEDS2_DEFAULT_MESSAGE_VERSION: &str = "2.1.0";
/// SDK error domain of a shopper-cancelled challenge.
pub const THREEDS2_RUNTIME_ERROR_DOMAIN: &str = "ThreeDS2SDK.RuntimeError";
/// SDK error code of a shopper-cancelled challenge.
pub const THREEDS2_CHALLENGE_CANCELLED_CODE: i64 = 10;
