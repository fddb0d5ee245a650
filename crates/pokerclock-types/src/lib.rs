//! Shared type definitions for the poker tournament clock.
//!
//! This crate holds the value types that flow between the clock engine and
//! everything that renders it. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the clock page.
//!
//! # Modules
//!
//! - [`enums`] -- Clock status, time alert level, tick outcome
//! - [`structs`] -- Round definition and clock snapshot

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ClockStatus, FINAL_COUNTDOWN_THRESHOLD_SECS, TickOutcome, TimeAlert, WARNING_THRESHOLD_SECS,
};
pub use structs::{ClockSnapshot, Round};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Exporting writes to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::enums::ClockStatus::export_all();
        let _ = crate::enums::TimeAlert::export_all();
        let _ = crate::enums::TickOutcome::export_all();
        let _ = crate::structs::Round::export_all();
        let _ = crate::structs::ClockSnapshot::export_all();
    }
}
