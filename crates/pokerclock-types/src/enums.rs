//! Enumeration types for the tournament clock.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Clock status
// ---------------------------------------------------------------------------

/// The state of the clock engine's state machine.
///
/// `Paused` is the initial state. `Complete` is terminal: once the last
/// round has run out, no command or tick leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ClockStatus {
    /// Time is not advancing; a start or toggle resumes it.
    Paused,
    /// Ticks are decrementing the remaining time.
    Running,
    /// The final round ran out. Terminal.
    Complete,
}

// ---------------------------------------------------------------------------
// Time alert
// ---------------------------------------------------------------------------

/// Remaining seconds at or below which the clock is in [`TimeAlert::Warning`].
pub const WARNING_THRESHOLD_SECS: u64 = 120;

/// Remaining seconds at or below which the clock is in
/// [`TimeAlert::FinalCountdown`].
pub const FINAL_COUNTDOWN_THRESHOLD_SECS: u64 = 10;

/// How urgently the remaining time of the current round should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TimeAlert {
    /// More than two minutes left, or the clock reads zero.
    Normal,
    /// Between 11 and 120 seconds left.
    Warning,
    /// Between 1 and 10 seconds left.
    FinalCountdown,
}

impl TimeAlert {
    /// Classify a remaining-seconds value.
    ///
    /// Zero is `Normal`: a clock at zero has either completed or is about
    /// to switch rounds.
    pub const fn for_remaining(remaining_seconds: u64) -> Self {
        match remaining_seconds {
            0 => Self::Normal,
            1..=FINAL_COUNTDOWN_THRESHOLD_SECS => Self::FinalCountdown,
            _ if remaining_seconds <= WARNING_THRESHOLD_SECS => Self::Warning,
            _ => Self::Normal,
        }
    }
}

// ---------------------------------------------------------------------------
// Tick outcome
// ---------------------------------------------------------------------------

/// What a single `tick()` call did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TickOutcome {
    /// The clock was paused or complete; nothing changed.
    Inert,
    /// One second was consumed within the current round.
    Counted {
        /// Seconds left in the current round after this tick.
        #[ts(type = "number")]
        remaining_seconds: u64,
    },
    /// The current round ran out and the next one began.
    RoundAdvanced {
        /// Index of the round that just started.
        round_index: usize,
    },
    /// The final round ran out; the tournament is over.
    Completed,
}

impl TickOutcome {
    /// Whether this tick changed any clock state.
    pub const fn is_effective(self) -> bool {
        !matches!(self, Self::Inert)
    }
}
