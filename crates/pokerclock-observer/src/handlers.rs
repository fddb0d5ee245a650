//! Read-only REST handlers and the clock face page.
//!
//! All reads are served from the controller's latest published snapshot
//! or from the immutable schedule, so none of them wait on the engine.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use pokerclock_types::{ClockSnapshot, Round};

use crate::error::ObserverError;
use crate::state::AppState;

/// Full-screen clock face. `__TOURNAMENT__` is replaced with the
/// escaped tournament name.
const CLOCK_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>__TOURNAMENT__</title>
    <style>
        html, body { height: 100%; margin: 0; }
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            text-align: center;
        }
        body.break { background: #0f2a1a; }
        #tournament { color: #8b949e; font-size: 2vw; }
        #round { color: #58a6ff; font-size: 5vw; margin: 0.5vw 0; }
        #name { font-size: 3vw; }
        #time { font-size: 18vw; font-weight: bold; letter-spacing: 0.05em; }
        #time.warning { color: #d29922; }
        #time.final_countdown { color: #f85149; }
        #next { color: #8b949e; font-size: 3vw; }
        #status { font-size: 2.5vw; margin-top: 2vw; }
        #status.paused { color: #d29922; }
        #status.complete { color: #3fb950; }
        #hint { position: fixed; bottom: 1rem; color: #484f58; font-size: 1rem; }
    </style>
</head>
<body>
    <div id="tournament">__TOURNAMENT__</div>
    <div id="round">&nbsp;</div>
    <div id="name">&nbsp;</div>
    <div id="time">--:--:--</div>
    <div id="next">&nbsp;</div>
    <div id="status">CONNECTING</div>
    <div id="hint">SPACE to start / pause</div>
    <script>
        const pad = (n) => String(n).padStart(2, "0");
        const hms = (s) => `${pad(Math.floor(s / 3600))}:${pad(Math.floor((s % 3600) / 60))}:${pad(s % 60)}`;
        const banner = { paused: "PAUSED", running: "RUNNING", complete: "TOURNAMENT COMPLETE" };

        function render(snap) {
            document.getElementById("round").textContent = `Round ${snap.round.number}`;
            document.getElementById("name").textContent = snap.round.name;
            const time = document.getElementById("time");
            time.textContent = hms(snap.remaining_seconds);
            time.className = snap.alert;
            document.getElementById("next").textContent =
                snap.next_round ? `Next: ${snap.next_round.name}` : "Final Round";
            const status = document.getElementById("status");
            status.textContent = banner[snap.status];
            status.className = snap.status;
            document.body.className = snap.round.is_break ? "break" : "";
        }

        function connect() {
            const proto = location.protocol === "https:" ? "wss" : "ws";
            const ws = new WebSocket(`${proto}://${location.host}/ws/clock`);
            ws.onmessage = (ev) => render(JSON.parse(ev.data));
            ws.onclose = () => {
                document.getElementById("status").textContent = "DISCONNECTED";
                setTimeout(connect, 1000);
            };
        }

        document.addEventListener("keydown", (ev) => {
            if (ev.code === "Space") {
                ev.preventDefault();
                fetch("/api/clock/toggle", { method: "POST" });
            }
        });

        connect();
    </script>
</body>
</html>
"#;

/// Escape text for inclusion in HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serve the full-screen clock page.
///
/// # Route
///
/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let name = escape_html(state.controller.tournament_name());
    Html(CLOCK_PAGE.replace("__TOURNAMENT__", &name))
}

/// Current clock snapshot.
///
/// # Route
///
/// `GET /api/clock`
pub async fn get_clock(State(state): State<Arc<AppState>>) -> Json<ClockSnapshot> {
    Json(state.snapshot())
}

/// All rounds in schedule order.
///
/// # Route
///
/// `GET /api/schedule`
pub async fn list_rounds(State(state): State<Arc<AppState>>) -> Json<Vec<Round>> {
    Json(state.controller.rounds().to_vec())
}

/// One round by zero-based index.
///
/// # Route
///
/// `GET /api/schedule/{index}`
///
/// # Errors
///
/// Returns [`ObserverError::NotFound`] if the index is out of range.
pub async fn get_round(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<Round>, ObserverError> {
    state
        .controller
        .schedule()
        .get(index)
        .map(|round| Json(round.clone()))
        .map_err(|e| ObserverError::NotFound(e.to_string()))
}
