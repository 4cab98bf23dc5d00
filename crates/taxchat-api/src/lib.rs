//! taxchat-api
//!
//! HTTP client for the taxchat backend. Thin wrapper around `reqwest` —
//! one method per endpoint, no retry, no caching.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
