//! Shared, serialized control of one clock engine.
//!
//! The tick driver, the keyboard task, and the observer's HTTP handlers all
//! act on the same clock concurrently. [`ClockController`] owns the engine
//! behind an async mutex so every command and tick applies atomically, and
//! publishes a fresh [`ClockSnapshot`] on a [`watch`] channel after each
//! state change. Renderers subscribe to that channel instead of polling.
//!
//! # Architecture
//!
//! The controller is wrapped in [`Arc`](std::sync::Arc) and shared between
//! the tick driver task and the Axum handler tasks. Reads of the latest
//! snapshot go through the watch channel and never take the engine lock.

use chrono::{DateTime, Utc};
use pokerclock_types::{ClockSnapshot, ClockStatus, Round, TickOutcome};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::info;

use crate::clock::TournamentClock;
use crate::schedule::Schedule;

/// Reason the clock driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockEndReason {
    /// The final round ran out.
    TournamentComplete,
    /// An operator asked the clock to stop.
    OperatorStop,
}

/// Where a command came from, for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    /// The terminal keyboard task.
    Keyboard,
    /// The observer HTTP API.
    Api,
}

impl std::fmt::Display for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyboard => f.write_str("keyboard"),
            Self::Api => f.write_str("api"),
        }
    }
}

/// Shared clock control state.
#[derive(Debug)]
pub struct ClockController {
    /// The engine. All mutation goes through this lock.
    clock: Mutex<TournamentClock>,

    /// Latest snapshot, republished after every state change.
    updates: watch::Sender<ClockSnapshot>,

    /// Set once a stop has been requested.
    stop: watch::Sender<bool>,

    /// The schedule, for read-only listing.
    schedule: Schedule,

    /// Tournament display name.
    tournament_name: String,

    /// Real-time milliseconds per tick.
    tick_interval_ms: u64,

    /// Wall-clock time when the controller was created.
    started_at: DateTime<Utc>,

    /// Reason the driver stopped, if it has.
    end_reason: Mutex<Option<ClockEndReason>>,
}

impl ClockController {
    /// Wrap an engine for shared use.
    pub fn new(clock: TournamentClock, tournament_name: String, tick_interval_ms: u64) -> Self {
        let (updates, _) = watch::channel(clock.snapshot());
        let (stop, _) = watch::channel(false);
        Self {
            schedule: clock.schedule().clone(),
            clock: Mutex::new(clock),
            updates,
            stop,
            tournament_name,
            tick_interval_ms,
            started_at: Utc::now(),
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Start the clock if paused. Returns the resulting snapshot.
    pub async fn start(&self, source: CommandSource) -> ClockSnapshot {
        let mut clock = self.clock.lock().await;
        if clock.start() {
            info!(%source, remaining_seconds = clock.remaining_seconds(), "Clock started");
        }
        self.publish(&clock)
    }

    /// Pause the clock if running. Returns the resulting snapshot.
    pub async fn pause(&self, source: CommandSource) -> ClockSnapshot {
        let mut clock = self.clock.lock().await;
        if clock.pause() {
            info!(%source, remaining_seconds = clock.remaining_seconds(), "Clock paused");
        }
        self.publish(&clock)
    }

    /// Toggle between running and paused. Returns the resulting snapshot.
    pub async fn toggle(&self, source: CommandSource) -> ClockSnapshot {
        let mut clock = self.clock.lock().await;
        let before = clock.status();
        let after = clock.toggle();
        if before != after {
            info!(
                %source,
                from = ?before,
                to = ?after,
                remaining_seconds = clock.remaining_seconds(),
                "Clock toggled"
            );
        }
        self.publish(&clock)
    }

    /// Advance the clock by one second.
    ///
    /// Only the tick driver should call this. Subscribers are notified
    /// when the tick had an effect.
    pub async fn tick(&self) -> TickOutcome {
        let mut clock = self.clock.lock().await;
        let outcome = clock.tick();
        if outcome.is_effective() {
            self.publish(&clock);
        }
        outcome
    }

    /// Publish the engine's current snapshot and return it.
    ///
    /// Called with the engine lock held so published snapshots are
    /// totally ordered.
    fn publish(&self, clock: &TournamentClock) -> ClockSnapshot {
        let snapshot = clock.snapshot();
        if *self.updates.borrow() != snapshot {
            self.updates.send_replace(snapshot.clone());
        }
        snapshot
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.updates.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    ///
    /// The receiver starts with the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<ClockSnapshot> {
        self.updates.subscribe()
    }

    /// The tournament's schedule.
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The tournament's rounds in order.
    pub fn rounds(&self) -> &[Round] {
        self.schedule.rounds()
    }

    /// Tournament display name.
    pub fn tournament_name(&self) -> &str {
        &self.tournament_name
    }

    /// Real-time milliseconds per tick.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Whole seconds since the controller was created.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // `num_seconds` can be negative if clocks are weird; treat as 0.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop of the tick driver.
    pub fn request_stop(&self) {
        if !self.stop.send_replace(true) {
            info!("Stop requested");
        }
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        *self.stop.borrow()
    }

    /// Wait until a stop is requested. Returns immediately if it already was.
    pub async fn wait_for_stop(&self) {
        let mut rx = self.stop.subscribe();
        // The sender lives in `self`, so the channel cannot close while
        // this future is alive.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Record the reason the driver stopped.
    pub async fn set_end_reason(&self, reason: ClockEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// The reason the driver stopped, if it has.
    pub async fn end_reason(&self) -> Option<ClockEndReason> {
        *self.end_reason.lock().await
    }

    /// Gather a status report for the operator API.
    pub async fn status_report(&self) -> ControllerStatus {
        let snapshot = self.snapshot();
        ControllerStatus {
            tournament_name: self.tournament_name.clone(),
            status: snapshot.status,
            round_index: snapshot.round_index,
            round_count: snapshot.round_count,
            remaining_seconds: snapshot.remaining_seconds,
            tick_interval_ms: self.tick_interval_ms,
            stop_requested: self.is_stop_requested(),
            elapsed_seconds: self.elapsed_seconds(),
            end_reason: self.end_reason().await,
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

/// JSON-serializable controller status for the operator API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Tournament display name.
    pub tournament_name: String,
    /// Clock state machine status.
    pub status: ClockStatus,
    /// Index of the current round.
    pub round_index: usize,
    /// Number of rounds in the schedule.
    pub round_count: usize,
    /// Seconds left in the current round.
    pub remaining_seconds: u64,
    /// Real-time milliseconds per tick.
    pub tick_interval_ms: u64,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Why the driver stopped, once it has.
    pub end_reason: Option<ClockEndReason>,
    /// ISO 8601 timestamp of controller creation.
    pub started_at: String,
}
