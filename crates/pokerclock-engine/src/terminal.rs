//! Terminal clock face.
//!
//! Redraws a single status line on stdout for every published snapshot
//! and prints a heading whenever a new round begins. Logs go to stderr so
//! they never tear the clock line.

use std::sync::Arc;

use pokerclock_core::display::{format_remaining, next_round_label, round_label, status_label};
use pokerclock_core::operator::ClockController;
use pokerclock_types::{ClockSnapshot, ClockStatus};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Heading printed when a round begins.
pub fn round_heading(snapshot: &ClockSnapshot) -> String {
    let kind = if snapshot.round.is_break { " (break)" } else { "" };
    format!(
        "== {} of {}: {}{kind} ==",
        round_label(&snapshot.round),
        snapshot.round_count,
        snapshot.round.name
    )
}

/// The live clock line.
pub fn clock_line(snapshot: &ClockSnapshot) -> String {
    format!(
        "{}  |  {}  |  {}",
        format_remaining(snapshot.remaining_seconds),
        next_round_label(snapshot.next_round.as_ref()),
        status_label(snapshot.status)
    )
}

/// Render snapshots until the clock completes or is stopped.
pub async fn run_renderer(controller: Arc<ClockController>) {
    let mut rx = controller.subscribe();
    let mut stdout = tokio::io::stdout();
    let mut last_round: Option<usize> = None;

    loop {
        let snapshot = rx.borrow_and_update().clone();

        let mut out = String::new();
        if last_round != Some(snapshot.round_index) {
            if last_round.is_some() {
                out.push('\n');
            }
            out.push_str(&round_heading(&snapshot));
            out.push('\n');
            last_round = Some(snapshot.round_index);
        }
        // Carriage return plus erase-line redraws in place.
        out.push_str("\r\x1b[2K");
        out.push_str(&clock_line(&snapshot));
        if snapshot.status == ClockStatus::Complete {
            out.push('\n');
        }

        if stdout.write_all(out.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            debug!("Stdout closed, terminal face off");
            return;
        }
        if snapshot.status == ClockStatus::Complete {
            return;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            () = controller.wait_for_stop() => {
                let _ = stdout.write_all(b"\n").await;
                let _ = stdout.flush().await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pokerclock_types::{Round, TimeAlert};

    use super::*;

    fn snapshot(remaining_seconds: u64, status: ClockStatus, next: bool) -> ClockSnapshot {
        ClockSnapshot {
            round_index: 1,
            round_count: 3,
            round: Round {
                number: 2,
                name: String::from("Color Up"),
                duration: 600,
                is_break: true,
            },
            remaining_seconds,
            status,
            next_round: next.then(|| Round {
                number: 3,
                name: String::from("Blinds 100/200"),
                duration: 1200,
                is_break: false,
            }),
            alert: TimeAlert::for_remaining(remaining_seconds),
        }
    }

    #[test]
    fn heading_names_round_and_break() {
        let heading = round_heading(&snapshot(600, ClockStatus::Running, true));
        assert_eq!(heading, "== Round 2 of 3: Color Up (break) ==");
    }

    #[test]
    fn clock_line_shows_time_next_and_status() {
        let line = clock_line(&snapshot(599, ClockStatus::Running, true));
        assert_eq!(line, "00:09:59  |  Next: Blinds 100/200  |  RUNNING");

        let line = clock_line(&snapshot(0, ClockStatus::Complete, false));
        assert_eq!(line, "00:00:00  |  Final Round  |  TOURNAMENT COMPLETE");
    }
}
