//! `WebSocket` handler for live clock snapshots.
//!
//! Clients connect to `GET /ws/clock` and receive the current
//! [`ClockSnapshot`] as a JSON text frame, then one more every time the
//! clock's state changes. The handler follows the controller's watch
//! channel, so a slow client only ever sees the newest snapshot.
//!
//! [`ClockSnapshot`]: pokerclock_types::ClockSnapshot

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use pokerclock_types::ClockSnapshot;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming snapshots.
///
/// # Route
///
/// `GET /ws/clock`
pub async fn ws_clock(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Send a snapshot as a text frame. Returns `false` once the client is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &ClockSnapshot) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize clock snapshot: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket client disconnected (send failed)");
        return false;
    }
    true
}

/// Handle the `WebSocket` lifecycle: send the current snapshot, then
/// forward each update until either side goes away.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    let initial = rx.borrow_and_update().clone();
    if !send_snapshot(&mut socket, &initial).await {
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Snapshot channel closed, shutting down WebSocket");
                    return;
                }
                let snapshot = rx.borrow_and_update().clone();
                if !send_snapshot(&mut socket, &snapshot).await {
                    return;
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Commands go through the REST API.
                    }
                }
            }
        }
    }
}
