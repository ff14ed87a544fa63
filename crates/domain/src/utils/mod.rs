//! Encoding helpers shared by the token and details types

pub mod coder;

pub use coder::{decode_base64_json, encode_base64_json};
