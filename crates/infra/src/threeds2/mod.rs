//! Backend adapters for the 3DS2 flow

mod submitter;

pub use submitter::ApiFingerprintSubmitter;
