//! Live preview server for m2h.
//!
//! This crate serves a single markdown document over HTTP using axum:
//! - `GET /` renders the document on every request
//! - `GET /socket` pushes reload signals over WebSocket (live reload)
//! - any other path is served as a static file from the document's directory
//!
//! On Ctrl-C the server stops accepting connections, closes live reload
//! sockets, then writes one final export of the document.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use m2h_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source: PathBuf::from("notes.md"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (m2h-server)
//!                        │
//!                        ├─► GET / ──► Pipeline (render per request)
//!                        │
//!                        ├─► WebSocket (LiveReloadManager)
//!                        │       │
//!                        │       └─► notify ──► debouncer ──► broadcast
//!                        │
//!                        └─► Static files (source directory)
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use m2h_renderer::{Pipeline, RenderOptions};
use state::AppState;
use tokio::sync::broadcast;

pub use error::ServerError;

/// Upper bound on the export written during shutdown.
pub const FINAL_EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Markdown document to preview.
    pub source: PathBuf,
    /// Render configuration.
    pub render: RenderOptions,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Quiet period after the last change before clients reload.
    pub debounce: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            source: PathBuf::from("README.md"),
            render: RenderOptions::default(),
            live_reload_enabled: true,
            debounce: Duration::from_millis(300),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::path::absolute(&config.source)?;
    let pipeline = Pipeline::new(config.render.clone());

    // Create live reload manager if enabled
    let live_reload = if config.live_reload_enabled {
        let stylesheets = pipeline.local_stylesheets(&source).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cannot resolve stylesheets to watch");
            Vec::new()
        });
        let stylesheets = stylesheets
            .iter()
            .filter_map(|sheet| std::path::absolute(sheet).ok())
            .collect();
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadSignal>(16);
        let mut manager =
            live_reload::LiveReloadManager::new(source.clone(), stylesheets, config.debounce, tx);
        match manager.start() {
            Ok(()) => Some(manager),
            Err(e) => {
                tracing::warn!(error = %e, "File watcher unavailable, live reload disabled");
                None
            }
        }
    } else {
        None
    };

    // Create app state
    let state = Arc::new(AppState::new(source, pipeline, live_reload));

    // Create router
    let app = app::create_router(Arc::clone(&state));

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source = %state.source.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&state)))
        .await?;

    // Listener is closed and clients are gone; write the last render.
    final_export(state).await;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C), then disconnect live reload clients.
async fn shutdown_signal(state: Arc<AppState>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");

    state.shutdown.send_replace(true);
}

/// Write the current render to disk, bounded by [`FINAL_EXPORT_TIMEOUT`].
///
/// Failures are logged and never block shutdown. A timed-out export keeps
/// running on its blocking thread; the caller bounds runtime teardown.
async fn final_export(state: Arc<AppState>) {
    let task = tokio::task::spawn_blocking(move || state.pipeline.export(&state.source));

    match tokio::time::timeout(FINAL_EXPORT_TIMEOUT, task).await {
        Ok(Ok(Ok(output))) => tracing::info!(output = %output.display(), "Final export written"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Final export failed"),
        Ok(Err(e)) => tracing::error!(error = %e, "Final export task panicked"),
        Err(_) => tracing::error!(
            timeout_secs = FINAL_EXPORT_TIMEOUT.as_secs(),
            "Final export timed out"
        ),
    }
}

/// Create server configuration from m2h config.
///
/// # Arguments
///
/// * `config` - m2h configuration
/// * `source` - Markdown document to preview
/// * `render` - Render options resolved from the configuration
#[must_use]
pub fn server_config_from_m2h_config(
    config: &m2h_config::Config,
    source: PathBuf,
    render: RenderOptions,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source,
        render,
        live_reload_enabled: config.live_reload.enabled,
        debounce: config.live_reload.debounce(),
    }
}
