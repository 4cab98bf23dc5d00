//! Terminal UI: application state, event loop, and rendering.

pub mod app;
mod render;

pub use app::App;
