//! HTTP session shared by every API client

mod client;

pub use client::{HttpClient, HttpClientBuilder};
