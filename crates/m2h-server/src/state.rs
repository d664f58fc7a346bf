//! Application state.
//!
//! Shared state for all request handlers.

use std::path::{Path, PathBuf};

use m2h_renderer::Pipeline;
use tokio::sync::watch;

use crate::live_reload::LiveReloadManager;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Absolute path of the markdown document being previewed.
    pub(crate) source: PathBuf,
    /// Render pipeline, run once per request.
    pub(crate) pipeline: Pipeline,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
    /// Flipped to `true` once the server starts shutting down.
    pub(crate) shutdown: watch::Sender<bool>,
}

impl AppState {
    pub(crate) fn new(
        source: PathBuf,
        pipeline: Pipeline,
        live_reload: Option<LiveReloadManager>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            source,
            pipeline,
            live_reload,
            shutdown,
        }
    }

    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }

    /// Directory static files are served from.
    #[must_use]
    pub(crate) fn static_root(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new("."))
    }
}
