//! Clock face and control API server for the poker tournament clock.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Clock page** (`GET /`) that renders the live clock full-screen
//!   and toggles it on SPACE
//! - **`WebSocket` endpoint** (`/ws/clock`) streaming every snapshot
//!   change via [`tokio::sync::watch`]
//! - **REST endpoints** for the current snapshot, the schedule, and the
//!   controller status
//! - **Control endpoints** for start, pause, toggle, and stop
//!
//! # Architecture
//!
//! Every handler shares one [`ClockController`] with the engine's tick
//! driver. Reads are served from the latest published snapshot; commands
//! take the controller's lock and so never interleave with a tick.
//!
//! [`ClockController`]: pokerclock_core::operator::ClockController

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::{ObserverHandle, StartupError, spawn_observer};
pub use state::AppState;
