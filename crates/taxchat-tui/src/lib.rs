//! taxchat-tui library root.
//!
//! Re-exports internal modules so integration tests can exercise the chat
//! flow, the status poller, and the upload simulation directly, without
//! going through the terminal.

pub mod chat;
pub mod config;
pub mod demo;
pub mod documents;
pub mod events;
pub mod poller;
pub mod taxpayers;
pub mod ui;

use std::sync::Arc;

use tokio::sync::Mutex;

use taxchat_core::store::AppStore;

/// The store handle shared between the UI task and async completions.
pub type SharedStore = Arc<Mutex<AppStore>>;

pub fn new_shared_store() -> SharedStore {
    Arc::new(Mutex::new(AppStore::new()))
}
