//! taxchat-core
//!
//! Pure domain types and the in-memory application store.
//! No HTTP dependency — this is the shared vocabulary of the taxchat client.

pub mod error;
pub mod models;
pub mod store;
