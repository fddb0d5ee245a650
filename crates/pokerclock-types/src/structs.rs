//! Value structs shared between the clock engine and its presentations.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ClockStatus, TimeAlert};

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One timed segment of the tournament: a level of play or a break.
///
/// Rounds are immutable once a schedule has been loaded. Construct them
/// through the schedule loader so the invariants below are checked:
///
/// - `number` is positive (display only, need not be contiguous)
/// - `name` is non-empty
/// - `duration` is at least one second
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Round {
    /// Display number ("Round 3").
    pub number: u32,
    /// Human-readable label, e.g. "Blinds 100/200" or "Dinner Break".
    pub name: String,
    /// Length of the round in seconds.
    #[ts(type = "number")]
    pub duration: u64,
    /// Whether this round is a break. Affects presentation only.
    #[serde(default)]
    pub is_break: bool,
}

// ---------------------------------------------------------------------------
// Clock snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the clock at one instant.
///
/// This is everything a renderer needs to draw the clock. It is
/// published after every state change and served by the observer API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockSnapshot {
    /// Zero-based index of the current round in the schedule.
    pub round_index: usize,
    /// Total number of rounds in the schedule.
    pub round_count: usize,
    /// The round currently on the clock.
    pub round: Round,
    /// Seconds left in the current round.
    #[ts(type = "number")]
    pub remaining_seconds: u64,
    /// State machine status.
    pub status: ClockStatus,
    /// The round that follows, or `None` on the final round.
    pub next_round: Option<Round>,
    /// Urgency of the remaining time.
    pub alert: TimeAlert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_is_break_defaults_to_false() {
        let round: Result<Round, _> =
            serde_json::from_str(r#"{"number":1,"name":"Level 1","duration":600}"#);
        assert!(round.is_ok());
        assert!(round.is_ok_and(|r| !r.is_break && r.duration == 600));
    }
}
