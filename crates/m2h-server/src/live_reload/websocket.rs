//! WebSocket handler for live reload.
//!
//! Forwards reload signals to clients as the text frame `reload`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use super::manager::ReloadSignal;
use crate::state::AppState;

/// Text frame sent to clients when the document should be reloaded.
pub(crate) const RELOAD_MESSAGE: &str = "reload";

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let Some(ref live_reload) = state.live_reload else {
        // Live reload not enabled, close connection
        return;
    };

    let mut receiver: broadcast::Receiver<ReloadSignal> = live_reload.subscribe();
    let mut shutdown = state.shutdown.subscribe();
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Forward reload signals to client
            result = receiver.recv() => {
                match result {
                    Ok(ReloadSignal) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if socket.send(Message::Text(RELOAD_MESSAGE.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            // Server is shutting down
            _ = shutdown.changed() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            // Handle client messages (for keepalive)
            result = socket.recv() => {
                match result {
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}
