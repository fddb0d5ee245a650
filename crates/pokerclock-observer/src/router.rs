//! Axum router construction for the observer.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled so other clock faces can connect.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// The router includes:
/// - `GET /` -- full-screen clock page
/// - `GET /ws/clock` -- `WebSocket` snapshot stream
/// - `GET /api/clock` -- current snapshot
/// - `GET /api/schedule` -- all rounds
/// - `GET /api/schedule/{index}` -- one round
/// - `GET /api/status` -- controller status
/// - `POST /api/clock/start`, `/api/clock/pause`, `/api/clock/toggle`
/// - `POST /api/stop` -- clean shutdown
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Clock face
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/clock", get(ws::ws_clock))
        // Read API
        .route("/api/clock", get(handlers::get_clock))
        .route("/api/schedule", get(handlers::list_rounds))
        .route("/api/schedule/{index}", get(handlers::get_round))
        .route("/api/status", get(operator::status))
        // Commands
        .route("/api/clock/start", post(operator::start))
        .route("/api/clock/pause", post(operator::pause))
        .route("/api/clock/toggle", post(operator::toggle))
        .route("/api/stop", post(operator::stop))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
