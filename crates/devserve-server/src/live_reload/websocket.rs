//! WebSocket handler for live reload.
//!
//! Each socket gets its own task: it registers with the connection registry,
//! forwards queued reload signals, and unregisters when the socket closes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use super::registry::ConnectionRegistry;
use crate::diagnostics;
use crate::state::AppState;

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(registry) = state.live_reload.clone() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Upgrade a request that reached the fallback router.
///
/// Browsers may open the channel on the bare `ws://host:port`, which lands on `/`.
pub(crate) async fn upgrade_request(
    req: Request<Body>,
    registry: Arc<ConnectionRegistry>,
) -> Response {
    let (mut parts, _body) = req.into_parts();
    match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, registry)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Handle an established WebSocket connection.
async fn handle_socket(mut socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    let (id, mut signals) = registry.connect();
    diagnostics::client_connected(id, registry.len());

    loop {
        tokio::select! {
            // Forward reload signals to the browser
            signal = signals.recv() => {
                let Some(signal) = signal else { break };
                if socket.send(Message::Text(signal.as_str().into())).await.is_err() {
                    break;
                }
            }
            // Clients send nothing meaningful; watch for close
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    registry.unregister(id);
    diagnostics::client_disconnected(id, registry.len());
}
