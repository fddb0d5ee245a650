//! Schedule model, clock state machine, and tick driver for the poker
//! tournament clock.
//!
//! # Modules
//!
//! - [`schedule`] -- Validated, ordered list of rounds.
//! - [`clock`] -- [`TournamentClock`], the countdown state machine.
//! - [`display`] -- Countdown and label formatting shared by renderers.
//! - [`config`] -- Loading `config.yml` into strongly-typed structs.
//! - [`operator`] -- [`ClockController`], serialized shared access to the
//!   engine with snapshot publishing.
//! - [`runner`] -- The real-time tick driver.
//!
//! [`TournamentClock`]: clock::TournamentClock
//! [`ClockController`]: operator::ClockController

pub mod clock;
pub mod config;
pub mod display;
pub mod operator;
pub mod runner;
pub mod schedule;
