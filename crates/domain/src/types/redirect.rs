//! Details extracted from a redirect return URL

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::Url;

use crate::errors::{PayflowError, Result};

/// What the issuer handed back on the return URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDetails {
    RedirectResult(String),
    Payload(String),
    /// 3DS1 response pair; both halves are required.
    PaRes { pa_res: String, md: String },
    /// Anything else: the raw query string is forwarded as is.
    QueryString(String),
}

impl RedirectDetails {
    /// Extracts details from `url`, checking `redirectResult`, then
    /// `payload`, then the `PaRes`/`MD` pair, then the raw query.
    pub fn from_return_url(url: &Url) -> Result<Self> {
        let mut redirect_result = None;
        let mut payload = None;
        let mut pa_res = None;
        let mut md = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "redirectResult" => redirect_result = Some(value.into_owned()),
                "payload" => payload = Some(value.into_owned()),
                "PaRes" => pa_res = Some(value.into_owned()),
                "MD" => md = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(value) = redirect_result {
            return Ok(Self::RedirectResult(value));
        }
        if let Some(value) = payload {
            return Ok(Self::Payload(value));
        }
        if let (Some(pa_res), Some(md)) = (pa_res, md) {
            return Ok(Self::PaRes { pa_res, md });
        }
        match url.query() {
            Some(query) if !query.is_empty() => Ok(Self::QueryString(query.to_owned())),
            _ => Err(PayflowError::InvalidReturnUrl(url.to_string())),
        }
    }
}

impl Serialize for RedirectDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::RedirectResult(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("redirectResult", value)?;
                map.end()
            }
            Self::Payload(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("payload", value)?;
                map.end()
            }
            Self::PaRes { pa_res, md } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("PaRes", pa_res)?;
                map.serialize_entry("MD", md)?;
                map.end()
            }
            Self::QueryString(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("queryString", value)?;
                map.end()
            }
        }
    }
}
