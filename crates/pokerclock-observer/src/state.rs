//! Shared application state for the observer server.
//!
//! [`AppState`] wraps the [`ClockController`] that the engine drives. REST
//! reads come from the controller's latest published snapshot and never
//! wait on the engine lock; commands go through the controller so they
//! serialize with the tick driver.

use std::sync::Arc;

use pokerclock_core::operator::ClockController;
use pokerclock_types::ClockSnapshot;
use tokio::sync::watch;

/// Shared state handed to every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The clock this server observes and controls.
    pub controller: Arc<ClockController>,
}

impl AppState {
    /// Create state around an existing controller.
    pub const fn new(controller: Arc<ClockController>) -> Self {
        Self { controller }
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.controller.snapshot()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<ClockSnapshot> {
        self.controller.subscribe()
    }
}
