//! Real-time tick driver.
//!
//! [`run_clock`] delivers one tick per configured interval to a
//! [`ClockController`] while the clock runs, and sleeps on the snapshot
//! channel while it is paused. It returns when the tournament completes
//! or an operator requests a stop.
//!
//! Each time the clock starts running the driver arms a fresh interval
//! whose first tick lands one full period later, so a freshly started
//! round shows its full duration for a whole second.

use std::sync::Arc;

use pokerclock_types::{ClockSnapshot, ClockStatus, TickOutcome};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::operator::{ClockController, ClockEndReason};

/// Result of a driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Why the driver stopped.
    pub end_reason: ClockEndReason,
    /// Number of ticks that changed clock state.
    pub ticks_applied: u64,
    /// Snapshot at the moment the driver stopped.
    pub final_snapshot: ClockSnapshot,
}

/// Drive the clock in real time until it completes or a stop is requested.
///
/// The end reason is recorded on the controller before returning.
pub async fn run_clock(controller: &Arc<ClockController>) -> RunResult {
    let period = Duration::from_millis(controller.tick_interval_ms());
    let mut updates = controller.subscribe();
    let mut ticks_applied: u64 = 0;

    info!(
        tick_interval_ms = controller.tick_interval_ms(),
        rounds = controller.rounds().len(),
        "Clock driver starting"
    );

    let end_reason = loop {
        if controller.is_stop_requested() {
            break ClockEndReason::OperatorStop;
        }

        match controller.snapshot().status {
            ClockStatus::Complete => break ClockEndReason::TournamentComplete,
            ClockStatus::Paused => {
                debug!("Driver idle while paused");
                tokio::select! {
                    () = controller.wait_for_stop() => {}
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break ClockEndReason::OperatorStop;
                        }
                    }
                }
                continue;
            }
            ClockStatus::Running => {}
        }

        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let _ = updates.borrow_and_update();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match controller.tick().await {
                        // Paused between the wake-up and the tick.
                        TickOutcome::Inert => break,
                        TickOutcome::Completed => {
                            ticks_applied = ticks_applied.saturating_add(1);
                            break;
                        }
                        TickOutcome::Counted { .. } | TickOutcome::RoundAdvanced { .. } => {
                            ticks_applied = ticks_applied.saturating_add(1);
                        }
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() || updates.borrow_and_update().status != ClockStatus::Running {
                        break;
                    }
                }
                () = controller.wait_for_stop() => break,
            }
        }
    };

    controller.set_end_reason(end_reason).await;
    RunResult {
        end_reason,
        ticks_applied,
        final_snapshot: controller.snapshot(),
    }
}

/// Log the end of a driver run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        ticks_applied = result.ticks_applied,
        round_index = result.final_snapshot.round_index,
        remaining_seconds = result.final_snapshot.remaining_seconds,
        "Clock driver stopped"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pokerclock_types::Round;

    use super::*;
    use crate::clock::TournamentClock;
    use crate::operator::CommandSource;
    use crate::schedule::Schedule;

    fn controller(durations: &[u64]) -> Arc<ClockController> {
        let rounds = durations
            .iter()
            .zip(1_u32..)
            .map(|(duration, number)| Round {
                number,
                name: format!("Level {number}"),
                duration: *duration,
                is_break: false,
            })
            .collect();
        let clock = TournamentClock::new(Schedule::from_rounds(rounds).unwrap()).unwrap();
        Arc::new(ClockController::new(clock, String::from("Driver Test"), 1000))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_schedule_to_completion_in_real_time() {
        let ctl = controller(&[3, 2]);
        ctl.start(CommandSource::Api).await;

        let began = Instant::now();
        let result = run_clock(&ctl).await;

        assert_eq!(result.end_reason, ClockEndReason::TournamentComplete);
        assert_eq!(result.ticks_applied, 5);
        assert_eq!(result.final_snapshot.status, ClockStatus::Complete);
        assert_eq!(result.final_snapshot.round_index, 1);
        assert_eq!(began.elapsed(), Duration::from_secs(5));
        assert_eq!(ctl.end_reason().await, Some(ClockEndReason::TournamentComplete));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_paused() {
        let ctl = controller(&[60]);
        let driver = {
            let ctl = Arc::clone(&ctl);
            tokio::spawn(async move { run_clock(&ctl).await })
        };

        tokio::time::sleep(Duration::from_secs(30)).await;
        ctl.request_stop();
        let result = driver.await.unwrap();

        assert_eq!(result.end_reason, ClockEndReason::OperatorStop);
        assert_eq!(result.ticks_applied, 0);
        assert_eq!(result.final_snapshot.remaining_seconds, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_running() {
        let ctl = controller(&[60]);
        ctl.start(CommandSource::Api).await;
        let driver = {
            let ctl = Arc::clone(&ctl);
            tokio::spawn(async move { run_clock(&ctl).await })
        };

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        ctl.request_stop();
        let result = driver.await.unwrap();

        assert_eq!(result.end_reason, ClockEndReason::OperatorStop);
        assert_eq!(result.ticks_applied, 10);
        assert_eq!(result.final_snapshot.remaining_seconds, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_remaining_time() {
        let ctl = controller(&[5, 4]);
        ctl.start(CommandSource::Api).await;
        let driver = {
            let ctl = Arc::clone(&ctl);
            tokio::spawn(async move { run_clock(&ctl).await })
        };

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let paused = ctl.pause(CommandSource::Keyboard).await;
        assert_eq!(paused.remaining_seconds, 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ctl.snapshot().remaining_seconds, 3);
        assert_eq!(ctl.snapshot().status, ClockStatus::Paused);

        ctl.toggle(CommandSource::Keyboard).await;
        let result = driver.await.unwrap();

        assert_eq!(result.end_reason, ClockEndReason::TournamentComplete);
        assert_eq!(result.ticks_applied, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn already_complete_returns_immediately() {
        let ctl = controller(&[1]);
        ctl.start(CommandSource::Api).await;
        assert_eq!(ctl.tick().await, TickOutcome::Completed);

        let result = run_clock(&ctl).await;
        assert_eq!(result.end_reason, ClockEndReason::TournamentComplete);
        assert_eq!(result.ticks_applied, 0);
    }
}
