//! Tournament clock engine: the round/timer state machine.
//!
//! The engine is the single owner of the clock state and the only thing
//! allowed to mutate it. Time enters exclusively through [`tick`], one
//! second per call; the engine never reads the wall clock. Mapping real
//! time onto tick calls is the job of the driver in [`crate::runner`].
//!
//! # States
//!
//! ```text
//!            start / toggle            last round runs out
//!   Paused  ----------------> Running -------------------> Complete
//!           <----------------
//!            pause / toggle
//! ```
//!
//! `Complete` is terminal: commands and ticks are no-ops once reached.
//!
//! # Invariants
//!
//! - the round index always points into the schedule; after completion it
//!   stays on the final round and the completion flag is the sentinel
//! - remaining seconds never exceed the current round's duration
//! - a complete clock is never running
//!
//! [`tick`]: TournamentClock::tick

use pokerclock_types::{ClockSnapshot, ClockStatus, Round, TickOutcome, TimeAlert};
use tracing::{debug, error, info};

use crate::schedule::{Schedule, ValidationError};

/// Mutable timer state. Only [`TournamentClock`] touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClockState {
    /// Index of the current round in the schedule.
    round_index: usize,
    /// The current round, cached so lookups cannot fail.
    round: Round,
    /// Seconds left in the current round.
    remaining_seconds: u64,
    /// Whether ticks currently advance time.
    running: bool,
    /// Whether the final round has run out.
    complete: bool,
}

/// The clock engine for one tournament.
///
/// Instances are fully independent; any number may coexist.
#[derive(Debug, Clone)]
pub struct TournamentClock {
    schedule: Schedule,
    state: ClockState,
}

impl TournamentClock {
    /// Create a paused clock at the start of the first round.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if the schedule has no rounds.
    pub fn new(schedule: Schedule) -> Result<Self, ValidationError> {
        let first = schedule
            .get(0)
            .map_err(|_err| ValidationError::Empty)?
            .clone();

        Ok(Self {
            state: ClockState {
                round_index: 0,
                remaining_seconds: first.duration,
                round: first,
                running: false,
                complete: false,
            },
            schedule,
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Start the clock if it is paused.
    ///
    /// Returns `true` if the clock changed state. Starting a running or
    /// complete clock does nothing.
    pub fn start(&mut self) -> bool {
        if self.status() != ClockStatus::Paused {
            return false;
        }
        self.state.running = true;
        debug!(
            round_index = self.state.round_index,
            remaining_seconds = self.state.remaining_seconds,
            "Clock started"
        );
        true
    }

    /// Pause the clock if it is running.
    ///
    /// Returns `true` if the clock changed state.
    pub fn pause(&mut self) -> bool {
        if self.status() != ClockStatus::Running {
            return false;
        }
        self.state.running = false;
        debug!(
            round_index = self.state.round_index,
            remaining_seconds = self.state.remaining_seconds,
            "Clock paused"
        );
        true
    }

    /// Pause a running clock, otherwise start it. Returns the new status.
    pub fn toggle(&mut self) -> ClockStatus {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
        self.status()
    }

    /// Advance time by one second.
    ///
    /// Has no effect unless the clock is running. The tick that consumes
    /// the last second of a round also moves to the next round at its full
    /// duration, or, on the final round, completes the tournament and
    /// stops the clock. A round therefore lasts exactly `duration` ticks.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running || self.state.complete {
            return TickOutcome::Inert;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        self.finish_round()
    }

    /// Handle a round that has run out.
    fn finish_round(&mut self) -> TickOutcome {
        if self.schedule.is_last(self.state.round_index) {
            self.complete();
            return TickOutcome::Completed;
        }

        let next_index = self.state.round_index.saturating_add(1);
        match self.schedule.get(next_index) {
            Ok(next) => {
                self.state.round_index = next_index;
                self.state.remaining_seconds = next.duration;
                self.state.round = next.clone();
                info!(
                    round_index = next_index,
                    number = self.state.round.number,
                    name = %self.state.round.name,
                    duration = self.state.round.duration,
                    is_break = self.state.round.is_break,
                    "Round started"
                );
                TickOutcome::RoundAdvanced {
                    round_index: next_index,
                }
            }
            Err(err) => {
                // Unreachable while the index invariant holds. Stop rather
                // than run on with inconsistent state.
                error!(error = %err, "Round lookup failed, ending tournament");
                self.complete();
                TickOutcome::Completed
            }
        }
    }

    fn complete(&mut self) {
        self.state.complete = true;
        self.state.running = false;
        info!(
            rounds = self.schedule.len(),
            total_seconds = self.schedule.total_duration_secs(),
            "Tournament complete"
        );
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The round currently on the clock (the final round once complete).
    pub const fn current_round(&self) -> &Round {
        &self.state.round
    }

    /// Zero-based index of the current round.
    pub const fn current_round_index(&self) -> usize {
        self.state.round_index
    }

    /// Seconds left in the current round.
    pub const fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    /// Current state machine status.
    pub const fn status(&self) -> ClockStatus {
        if self.state.complete {
            ClockStatus::Complete
        } else if self.state.running {
            ClockStatus::Running
        } else {
            ClockStatus::Paused
        }
    }

    /// Whether ticks currently advance time.
    pub const fn is_running(&self) -> bool {
        self.state.running
    }

    /// Whether the tournament has finished.
    pub const fn is_complete(&self) -> bool {
        self.state.complete
    }

    /// The round after the current one, or `None` on the final round.
    pub fn next_round_preview(&self) -> Option<&Round> {
        self.state
            .round_index
            .checked_add(1)
            .and_then(|index| self.schedule.get(index).ok())
    }

    /// The schedule this clock runs.
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Capture the full presentation state.
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            round_index: self.state.round_index,
            round_count: self.schedule.len(),
            round: self.state.round.clone(),
            remaining_seconds: self.state.remaining_seconds,
            status: self.status(),
            next_round: self.next_round_preview().cloned(),
            alert: TimeAlert::for_remaining(self.state.remaining_seconds),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn round(number: u32, name: &str, duration: u64, is_break: bool) -> Round {
        Round {
            number,
            name: name.to_owned(),
            duration,
            is_break,
        }
    }

    /// Five-second level followed by a three-second break.
    fn level_and_break() -> TournamentClock {
        let schedule = Schedule::from_rounds(vec![
            round(1, "R1", 5, false),
            round(2, "Break", 3, true),
        ])
        .unwrap();
        TournamentClock::new(schedule).unwrap()
    }

    fn tick_n(clock: &mut TournamentClock, n: u64) {
        for _ in 0..n {
            let _ = clock.tick();
        }
    }

    #[test]
    fn starts_paused_at_first_round() {
        let clock = level_and_break();
        assert_eq!(clock.current_round_index(), 0);
        assert_eq!(clock.remaining_seconds(), 5);
        assert_eq!(clock.status(), ClockStatus::Paused);
        assert!(!clock.is_running());
        assert!(!clock.is_complete());
        assert_eq!(clock.current_round().name, "R1");
    }

    #[test]
    fn level_then_break_scenario() {
        let mut clock = level_and_break();
        assert!(clock.start());

        tick_n(&mut clock, 5);
        assert_eq!(clock.current_round_index(), 1);
        assert_eq!(clock.remaining_seconds(), 3);
        assert_eq!(clock.status(), ClockStatus::Running);
        assert!(clock.current_round().is_break);

        tick_n(&mut clock, 3);
        assert!(clock.is_complete());
        assert!(!clock.is_running());
        assert_eq!(clock.status(), ClockStatus::Complete);
    }

    #[test]
    fn tick_outcomes_describe_each_step() {
        let mut clock = level_and_break();
        assert_eq!(clock.tick(), TickOutcome::Inert);
        clock.start();
        assert_eq!(
            clock.tick(),
            TickOutcome::Counted {
                remaining_seconds: 4
            }
        );
        tick_n(&mut clock, 3);
        assert_eq!(clock.tick(), TickOutcome::RoundAdvanced { round_index: 1 });
        tick_n(&mut clock, 2);
        assert_eq!(clock.tick(), TickOutcome::Completed);
        assert_eq!(clock.tick(), TickOutcome::Inert);
    }

    /// Run a schedule of the given durations to completion and check that it
    /// takes exactly the sum of the durations.
    fn assert_completes_after_total(durations: &[u64]) {
        let rounds = durations
            .iter()
            .zip(1_u32..)
            .map(|(duration, number)| round(number, "Level", *duration, false))
            .collect();
        let schedule = Schedule::from_rounds(rounds).unwrap();
        let total = schedule.total_duration_secs();
        let last = schedule.len().saturating_sub(1);
        let mut clock = TournamentClock::new(schedule).unwrap();
        clock.start();

        tick_n(&mut clock, total.saturating_sub(1));
        assert!(!clock.is_complete(), "{durations:?} completed early");
        assert_eq!(clock.current_round_index(), last, "{durations:?}");
        assert_eq!(clock.remaining_seconds(), 1, "{durations:?}");

        assert_eq!(clock.tick(), TickOutcome::Completed, "{durations:?}");
        let finished = clock.snapshot();
        tick_n(&mut clock, 50);
        assert_eq!(clock.snapshot(), finished, "{durations:?}");
        assert_eq!(finished.status, ClockStatus::Complete);
        assert_eq!(finished.round_index, last);
        assert_eq!(finished.remaining_seconds, 0);
    }

    #[test]
    fn completes_after_total_duration_and_stays_complete() {
        let fixed: [&[u64]; 6] = [
            &[1],
            &[7],
            &[1, 1, 1],
            &[4, 1, 2, 6],
            &[1, 30, 1],
            &[120, 1],
        ];
        for durations in fixed {
            assert_completes_after_total(durations);
        }

        // Deterministic pseudo-random schedules: 1 to 6 rounds of 1 to 9 s.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = |bound: u64| {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 33) % bound
        };
        for _ in 0..40 {
            let len = next(6).saturating_add(1);
            let durations: Vec<u64> = (0..len).map(|_| next(9).saturating_add(1)).collect();
            assert_completes_after_total(&durations);
        }
    }

    #[test]
    fn toggle_twice_is_lossless() {
        let mut clock = level_and_break();
        clock.start();
        tick_n(&mut clock, 2);
        let before = clock.snapshot();

        assert_eq!(clock.toggle(), ClockStatus::Paused);
        assert_eq!(clock.toggle(), ClockStatus::Running);
        assert_eq!(clock.snapshot(), before);

        // And from paused.
        clock.pause();
        let before = clock.snapshot();
        clock.toggle();
        clock.toggle();
        assert_eq!(clock.snapshot(), before);
    }

    #[test]
    fn tick_while_paused_changes_nothing() {
        let mut clock = level_and_break();
        clock.start();
        tick_n(&mut clock, 3);
        clock.pause();
        let before = clock.snapshot();

        tick_n(&mut clock, 10);
        assert_eq!(clock.snapshot(), before);
        assert_eq!(clock.remaining_seconds(), 2);
        assert_eq!(clock.current_round_index(), 0);
        assert!(!clock.is_complete());
    }

    #[test]
    fn tick_at_zero_moves_to_next_round() {
        let mut clock = level_and_break();
        clock.start();
        clock.state.remaining_seconds = 0;

        assert_eq!(clock.tick(), TickOutcome::RoundAdvanced { round_index: 1 });
        assert_eq!(clock.current_round_index(), 1);
        assert_eq!(clock.remaining_seconds(), 3);
    }

    #[test]
    fn commands_are_no_ops_when_not_applicable() {
        let mut clock = level_and_break();
        assert!(!clock.pause());
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.pause());
        assert!(!clock.pause());

        clock.start();
        tick_n(&mut clock, 8);
        assert!(clock.is_complete());
        assert!(!clock.start());
        assert!(!clock.pause());
        assert_eq!(clock.toggle(), ClockStatus::Complete);
        assert!(!clock.is_running());
    }

    #[test]
    fn next_round_preview_is_none_on_final_round() {
        let mut clock = level_and_break();
        assert_eq!(clock.next_round_preview().map(|r| r.name.as_str()), Some("Break"));
        clock.start();
        tick_n(&mut clock, 5);
        assert!(clock.next_round_preview().is_none());
    }

    #[test]
    fn snapshot_reflects_alert_level() {
        let schedule = Schedule::from_rounds(vec![round(1, "Level 1", 125, false)]).unwrap();
        let mut clock = TournamentClock::new(schedule).unwrap();
        assert_eq!(clock.snapshot().alert, TimeAlert::Normal);

        clock.start();
        tick_n(&mut clock, 5);
        assert_eq!(clock.snapshot().alert, TimeAlert::Warning);

        tick_n(&mut clock, 110);
        assert_eq!(clock.remaining_seconds(), 10);
        let snapshot = clock.snapshot();
        assert_eq!(snapshot.alert, TimeAlert::FinalCountdown);
        assert_eq!(snapshot.round_count, 1);
        assert!(snapshot.next_round.is_none());
    }

    #[test]
    fn remaining_never_exceeds_round_duration() {
        let mut clock = level_and_break();
        clock.start();
        for _ in 0..8 {
            assert!(clock.remaining_seconds() <= clock.current_round().duration);
            let _ = clock.tick();
        }
    }

    #[test]
    fn engines_are_independent() {
        let mut a = level_and_break();
        let b = level_and_break();
        a.start();
        tick_n(&mut a, 4);
        assert_eq!(a.remaining_seconds(), 1);
        assert_eq!(b.remaining_seconds(), 5);
        assert_eq!(b.status(), ClockStatus::Paused);
    }
}
