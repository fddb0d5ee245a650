//! Control handlers: start, pause, toggle, status, and stop.
//!
//! Commands go through the [`ClockController`] so they serialize with the
//! tick driver and with keyboard input. Once a stop has been requested no
//! driver is left to advance time, so further clock commands are refused.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/clock/start` | Start the clock |
//! | `POST` | `/api/clock/pause` | Pause the clock |
//! | `POST` | `/api/clock/toggle` | Start if paused, pause if running |
//! | `GET` | `/api/status` | Controller status |
//! | `POST` | `/api/stop` | Trigger clean shutdown |
//!
//! [`ClockController`]: pokerclock_core::operator::ClockController

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use pokerclock_core::operator::{CommandSource, ControllerStatus};
use pokerclock_types::ClockSnapshot;

use crate::error::ObserverError;
use crate::state::AppState;

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

/// Refuse clock commands once the driver has been told to stop.
fn ensure_not_stopped(state: &AppState) -> Result<(), ObserverError> {
    if state.controller.is_stop_requested() {
        return Err(ObserverError::Conflict(
            "clock has been stopped".to_owned(),
        ));
    }
    Ok(())
}

/// Start the clock.
///
/// # Errors
///
/// Returns [`ObserverError::Conflict`] after a stop request.
pub async fn start(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClockSnapshot>, ObserverError> {
    ensure_not_stopped(&state)?;
    Ok(Json(state.controller.start(CommandSource::Api).await))
}

/// Pause the clock.
///
/// # Errors
///
/// Returns [`ObserverError::Conflict`] after a stop request.
pub async fn pause(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClockSnapshot>, ObserverError> {
    ensure_not_stopped(&state)?;
    Ok(Json(state.controller.pause(CommandSource::Api).await))
}

/// Toggle the clock between running and paused.
///
/// # Errors
///
/// Returns [`ObserverError::Conflict`] after a stop request.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClockSnapshot>, ObserverError> {
    ensure_not_stopped(&state)?;
    Ok(Json(state.controller.toggle(CommandSource::Api).await))
}

/// Current controller status.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ControllerStatus> {
    Json(state.controller.status_report().await)
}

/// Request a clean shutdown of the clock.
///
/// The tick driver stops and the server drains in-flight requests.
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.controller.request_stop();

    Json(OperatorResponse {
        ok: true,
        message: "Stop requested".to_owned(),
    })
}
