//! Base64-wrapped JSON
//!
//! 3DS2 tokens arrive as base64 of a JSON object and fingerprints/results go
//! back out the same way. Padding is accepted when present and tolerated when
//! missing, output is always padded.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{PayflowError, Result};

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Serialize `value` to JSON and base64 it.
pub fn encode_base64_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| PayflowError::Encode(e.to_string()))?;
    Ok(ENGINE.encode(json))
}

/// Reverse of [`encode_base64_json`].
pub fn decode_base64_json<T: DeserializeOwned>(encoded: &str) -> Result<T> {
    let bytes = ENGINE
        .decode(encoded.trim())
        .map_err(|e| PayflowError::Decode(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| PayflowError::Decode(e.to_string()))
}
