//! Static file serving.
//!
//! Any path other than the document root is resolved against the source
//! document's directory, so relative images and attachments in the markdown
//! work in the preview.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{Uri, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::error::ServerError;
use crate::state::AppState;

/// Create router for static file serving.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_file)
}

/// Serve a file from the source directory.
async fn serve_file(State(state): State<Arc<AppState>>, uri: Uri) -> Result<Response, ServerError> {
    let request_path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let path = resolve_static_path(state.static_root(), &request_path)
        .ok_or_else(|| ServerError::NotFound(request_path.to_string()))?;

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            return Err(ServerError::NotFound(request_path.to_string()));
        }
        Err(e) => return Err(ServerError::Io(e)),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.as_ref().to_owned())], content).into_response())
}

/// Map a request path onto `root`.
///
/// Returns `None` for empty paths and for paths with `..`, `.`, root or
/// prefix components, so a request can never escape `root`.
fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}
