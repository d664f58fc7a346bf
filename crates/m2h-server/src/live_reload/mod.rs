//! Live reload system.
//!
//! Watches the document and its stylesheets, and notifies connected preview
//! clients over WebSocket when they change.

mod debouncer;
mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadSignal};
pub(crate) use websocket::ws_handler;

/// Client script that reloads the page when a reload signal arrives.
pub(crate) const RELOAD_SCRIPT: &str = include_str!("reload.js");
