//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Requested file does not exist or is not servable.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Render error from m2h-renderer.
    #[error("Render error: {0}")]
    Render(#[from] m2h_renderer::RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(path) => {
                tracing::debug!(path = %path, "Static file not found");
                StatusCode::NOT_FOUND
            }
            Self::Render(e) => {
                tracing::error!(error = %e, "Failed to render document");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Io(e) => {
                tracing::error!(error = %e, "I/O error while serving request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
