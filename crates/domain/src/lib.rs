//! # Payflow Domain
//!
//! Wire-level types for the payment action flows.
//!
//! This crate contains:
//! - Actions as the payment backend sends them (redirect, 3DS2, await)
//! - 3DS2 tokens, fingerprints and challenge results
//! - Details payloads handed back to the merchant
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Payflow crates
//! - Only external dependencies allowed
//! - Pure data structures and their encodings

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
