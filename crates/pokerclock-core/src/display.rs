//! Text formatting shared by every clock renderer.
//!
//! These helpers turn engine state into the strings a clock face shows:
//! the `HH:MM:SS` countdown, the round heading, the next-round line, and
//! the status banner. The terminal renderer and the observer API both use
//! them so every face reads the same.

use pokerclock_types::{ClockStatus, Round};

/// Format a number of seconds as zero-padded `HH:MM:SS`.
///
/// Hours are always shown and are not capped at 99.
pub fn format_remaining(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Heading for a round, e.g. `Round 4`.
pub fn round_label(round: &Round) -> String {
    format!("Round {}", round.number)
}

/// Line describing what comes next: `Next: <name>`, or `Final Round`.
pub fn next_round_label(next: Option<&Round>) -> String {
    next.map_or_else(
        || String::from("Final Round"),
        |round| format!("Next: {}", round.name),
    )
}

/// Status banner text.
pub const fn status_label(status: ClockStatus) -> &'static str {
    match status {
        ClockStatus::Paused => "PAUSED",
        ClockStatus::Running => "RUNNING",
        ClockStatus::Complete => "TOURNAMENT COMPLETE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_remaining(0), "00:00:00");
        assert_eq!(format_remaining(59), "00:00:59");
        assert_eq!(format_remaining(900), "00:15:00");
        assert_eq!(format_remaining(3661), "01:01:01");
        assert_eq!(format_remaining(360_000), "100:00:00");
    }

    #[test]
    fn labels() {
        let next = Round {
            number: 4,
            name: String::from("Dinner Break"),
            duration: 1800,
            is_break: true,
        };
        assert_eq!(round_label(&next), "Round 4");
        assert_eq!(next_round_label(Some(&next)), "Next: Dinner Break");
        assert_eq!(next_round_label(None), "Final Round");
        assert_eq!(status_label(ClockStatus::Paused), "PAUSED");
        assert_eq!(status_label(ClockStatus::Complete), "TOURNAMENT COMPLETE");
    }
}
