//! Document endpoint.
//!
//! Renders the markdown source on every request, so the response always
//! reflects the file as last saved.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::error::ServerError;
use crate::live_reload::RELOAD_SCRIPT;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_document(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let mut html = state.pipeline.render_html(&state.source)?;
    if state.live_reload_enabled() {
        inject_reload_script(&mut html);
    }

    Ok(([(header::CACHE_CONTROL, "no-store")], Html(html)))
}

/// Insert the reload script before `</body>`, or append it if there is none.
fn inject_reload_script(html: &mut String) {
    let script = format!("<script>{RELOAD_SCRIPT}</script>");
    match html.rfind("</body>") {
        Some(index) => html.insert_str(index, &script),
        None => html.push_str(&script),
    }
}
