//! 3DS2 tokens, fingerprints and results
//!
//! Tokens come from the backend as base64 JSON. Fingerprints and challenge
//! results go back the same way. Absent optional values are left out of the
//! encoded JSON entirely, never sent as `null`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use url::Url;

use crate::constants::{
    THREEDS2_CHALLENGE_CANCELLED_CODE, THREEDS2_DEFAULT_MESSAGE_VERSION,
    THREEDS2_RUNTIME_ERROR_DOMAIN, THREEDS2_TRANS_STATUS_UNKNOWN,
};
use crate::errors::{PayflowError, Result};
use crate::types::Action;
use crate::utils::{decode_base64_json, encode_base64_json};

// ============================================================================
// Tokens
// ============================================================================

/// Decoded fingerprint token: where the directory server lives and how to
/// talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintToken {
    #[serde(rename = "directoryServerId")]
    pub directory_server_id: String,
    #[serde(rename = "directoryServerPublicKey")]
    pub directory_server_public_key: String,
    #[serde(
        rename = "directoryServerRootCertificates",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub directory_server_root_certificates: Option<String>,
    #[serde(rename = "threeDSMessageVersion", default, skip_serializing_if = "Option::is_none")]
    pub three_ds_message_version: Option<String>,
    #[serde(rename = "threeDSServerTransID", default, skip_serializing_if = "Option::is_none")]
    pub three_ds_server_trans_id: Option<String>,
}

impl FingerprintToken {
    /// Decodes the base64 JSON token.
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_base64_json(encoded)
    }

    /// Protocol version to create the transaction with.
    pub fn message_version(&self) -> &str {
        self.three_ds_message_version.as_deref().unwrap_or(THREEDS2_DEFAULT_MESSAGE_VERSION)
    }

    /// Inputs for initializing the SDK service.
    pub fn service_parameters(&self) -> ServiceParameters {
        ServiceParameters {
            directory_server_identifier: self.directory_server_id.clone(),
            directory_server_public_key: self.directory_server_public_key.clone(),
            directory_server_root_certificates: self.directory_server_root_certificates.clone(),
        }
    }
}

/// Decoded challenge token: which ACS to talk to and with what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeToken {
    #[serde(rename = "acsReferenceNumber")]
    pub acs_reference_number: String,
    #[serde(rename = "acsSignedContent")]
    pub acs_signed_content: String,
    #[serde(rename = "acsTransID")]
    pub acs_trans_id: String,
    #[serde(rename = "acsURL", default, skip_serializing_if = "Option::is_none")]
    pub acs_url: Option<String>,
    #[serde(rename = "messageVersion", default, skip_serializing_if = "Option::is_none")]
    pub message_version: Option<String>,
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "threeDSRequestorAppURL", default, skip_serializing_if = "Option::is_none")]
    pub three_ds_requestor_app_url: Option<String>,
}

impl ChallengeToken {
    /// Decodes the base64 JSON token.
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_base64_json(encoded)
    }

    /// Builds the SDK challenge parameters. A configured requestor app URL
    /// wins over the one carried in the token; an unparseable token URL is
    /// dropped.
    pub fn challenge_parameters(&self, requestor_app_url: Option<&Url>) -> ChallengeParameters {
        let app_url = requestor_app_url.cloned().or_else(|| {
            self.three_ds_requestor_app_url.as_deref().and_then(|raw| Url::parse(raw).ok())
        });
        ChallengeParameters {
            three_ds_server_transaction_id: self.three_ds_server_trans_id.clone(),
            acs_transaction_id: self.acs_trans_id.clone(),
            acs_reference_number: self.acs_reference_number.clone(),
            acs_signed_content: self.acs_signed_content.clone(),
            three_ds_requestor_app_url: app_url,
        }
    }
}

/// Inputs for initializing the 3DS2 SDK service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParameters {
    pub directory_server_identifier: String,
    pub directory_server_public_key: String,
    pub directory_server_root_certificates: Option<String>,
}

/// Inputs for running a challenge on a live transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeParameters {
    pub three_ds_server_transaction_id: String,
    pub acs_transaction_id: String,
    pub acs_reference_number: String,
    pub acs_signed_content: String,
    pub three_ds_requestor_app_url: Option<Url>,
}

// ============================================================================
// SDK outputs
// ============================================================================

/// Device data the SDK produces for a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationRequestParameters {
    pub device_information: String,
    /// JWK of the SDK ephemeral key, as a JSON string.
    pub sdk_ephemeral_public_key: String,
    pub sdk_reference_number: String,
    pub sdk_application_identifier: String,
    pub sdk_transaction_identifier: String,
    pub message_version: String,
}

/// SDK ephemeral key as a JWK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralPublicKey {
    pub kty: String,
    pub crv: String,
    pub x: String,
    pub y: String,
}

/// Outcome of a completed challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResult {
    pub sdk_transaction_identifier: String,
    pub transaction_status: String,
}

/// Error raised by the 3DS2 SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{domain} ({code}): {description}")]
pub struct SdkError {
    pub domain: String,
    pub code: i64,
    pub description: String,
}

impl SdkError {
    /// SDK error with the given domain and code.
    pub fn new(domain: impl Into<String>, code: i64, description: impl Into<String>) -> Self {
        Self { domain: domain.into(), code, description: description.into() }
    }

    /// The error the SDK reports when the shopper backs out of a challenge.
    pub fn challenge_cancelled() -> Self {
        Self::new(
            THREEDS2_RUNTIME_ERROR_DOMAIN,
            THREEDS2_CHALLENGE_CANCELLED_CODE,
            "Challenge cancelled by the shopper",
        )
    }

    /// Whether this is the shopper backing out of a challenge.
    pub fn is_challenge_cancelled(&self) -> bool {
        self.domain == THREEDS2_RUNTIME_ERROR_DOMAIN
            && self.code == THREEDS2_CHALLENGE_CANCELLED_CODE
    }

    /// Base64 JSON form sent to the backend in `threeDS2SDKError`.
    pub fn base64_representation(&self) -> Result<String> {
        encode_base64_json(self)
    }
}

// ============================================================================
// Fingerprint
// ============================================================================

/// Device fingerprint sent back after the fingerprint step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    #[serde(rename = "sdkEncData", default, skip_serializing_if = "Option::is_none")]
    pub device_information: Option<String>,
    #[serde(rename = "sdkEphemPubKey", default, skip_serializing_if = "Option::is_none")]
    pub sdk_ephemeral_public_key: Option<EphemeralPublicKey>,
    #[serde(rename = "sdkReferenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub sdk_reference_number: Option<String>,
    #[serde(rename = "sdkAppID", default, skip_serializing_if = "Option::is_none")]
    pub sdk_application_identifier: Option<String>,
    #[serde(rename = "sdkTransID", default, skip_serializing_if = "Option::is_none")]
    pub sdk_transaction_identifier: Option<String>,
    #[serde(
        rename = "delegatedAuthenticationSDKOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delegated_authentication_sdk_output: Option<String>,
    #[serde(rename = "threeDS2SDKError", default, skip_serializing_if = "Option::is_none")]
    pub three_ds2_sdk_error: Option<String>,
}

impl Fingerprint {
    /// Fingerprint of a freshly created transaction.
    pub fn from_authentication_parameters(
        params: &AuthenticationRequestParameters,
        delegated_authentication_sdk_output: Option<String>,
    ) -> Result<Self> {
        let key: EphemeralPublicKey = serde_json::from_str(&params.sdk_ephemeral_public_key)
            .map_err(|e| PayflowError::Decode(format!("sdk ephemeral key: {e}")))?;
        Ok(Self {
            device_information: Some(params.device_information.clone()),
            sdk_ephemeral_public_key: Some(key),
            sdk_reference_number: Some(params.sdk_reference_number.clone()),
            sdk_application_identifier: Some(params.sdk_application_identifier.clone()),
            sdk_transaction_identifier: Some(params.sdk_transaction_identifier.clone()),
            delegated_authentication_sdk_output,
            three_ds2_sdk_error: None,
        })
    }

    /// Fingerprint carrying only an SDK failure, so the backend can decide
    /// how to continue.
    pub fn from_sdk_error(error: &SdkError) -> Result<Self> {
        Ok(Self { three_ds2_sdk_error: Some(error.base64_representation()?), ..Self::default() })
    }

    /// Base64 JSON, as sent to the backend.
    pub fn encode(&self) -> Result<String> {
        encode_base64_json(self)
    }
}

// ============================================================================
// Challenge result
// ============================================================================

/// JSON carried inside [`ThreeDSResult::payload`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDSResultPayload {
    #[serde(rename = "transStatus", default, skip_serializing_if = "Option::is_none")]
    pub trans_status: Option<String>,
    #[serde(rename = "authorisationToken", default, skip_serializing_if = "Option::is_none")]
    pub authorisation_token: Option<String>,
    #[serde(
        rename = "delegatedAuthenticationSDKOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delegated_authentication_sdk_output: Option<String>,
    #[serde(rename = "threeDS2SDKError", default, skip_serializing_if = "Option::is_none")]
    pub three_ds2_sdk_error: Option<String>,
}

/// Opaque, base64 encoded result of a 3DS2 flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDSResult {
    pub payload: String,
}

impl ThreeDSResult {
    /// Wraps an already encoded payload.
    pub fn new(payload: impl Into<String>) -> Self {
        Self { payload: payload.into() }
    }

    /// Result of a completed challenge.
    pub fn from_challenge_result(
        result: &ChallengeResult,
        authorisation_token: Option<&str>,
    ) -> Result<Self> {
        Self::from_payload(&ThreeDSResultPayload {
            trans_status: Some(result.transaction_status.clone()),
            authorisation_token: authorisation_token.map(str::to_owned),
            ..ThreeDSResultPayload::default()
        })
    }

    /// Terminal result for a challenge the SDK could not complete. The
    /// transaction status is unknown and the SDK error travels along.
    pub fn from_sdk_error(error: &SdkError, authorisation_token: Option<&str>) -> Result<Self> {
        Self::from_payload(&ThreeDSResultPayload {
            trans_status: Some(THREEDS2_TRANS_STATUS_UNKNOWN.to_owned()),
            authorisation_token: authorisation_token.map(str::to_owned),
            delegated_authentication_sdk_output: None,
            three_ds2_sdk_error: Some(error.base64_representation()?),
        })
    }

    fn from_payload(payload: &ThreeDSResultPayload) -> Result<Self> {
        Ok(Self { payload: encode_base64_json(payload)? })
    }

    /// Decodes the base64 JSON payload.
    pub fn decode_payload(&self) -> Result<ThreeDSResultPayload> {
        decode_base64_json(&self.payload)
    }

    /// Returns a copy with the delegated-authentication output set.
    pub fn with_delegated_authentication_sdk_output(&self, output: Option<String>) -> Result<Self> {
        let mut payload = self.decode_payload()?;
        payload.delegated_authentication_sdk_output = output;
        Self::from_payload(&payload)
    }
}

// ============================================================================
// Handler output
// ============================================================================

/// Details produced by the 3DS2 handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreeDS2Details {
    /// Classic flow: encoded fingerprint for `/payments/details`.
    Fingerprint(String),
    /// Classic flow: result of the challenge.
    ChallengeResult(ThreeDSResult),
    /// Compact flow: the whole 3DS2 exchange is done.
    Completed(ThreeDSResult),
}

impl ThreeDS2Details {
    /// Key the details are submitted under.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Fingerprint(_) => "threeds2.fingerprint",
            Self::ChallengeResult(_) => "threeds2.challengeResult",
            Self::Completed(_) => "threeDSResult",
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::Fingerprint(fingerprint) => fingerprint,
            Self::ChallengeResult(result) | Self::Completed(result) => &result.payload,
        }
    }
}

impl Serialize for ThreeDS2Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key(), self.value())?;
        map.end()
    }
}

/// What a 3DS2 step resolved to: another action or final details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreeDSActionHandlerResult {
    Action(Action),
    Details(ThreeDS2Details),
}
