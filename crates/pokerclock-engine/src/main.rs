//! Poker tournament clock binary.
//!
//! Wires the clock engine to a real-time tick driver, a terminal clock
//! face, line-based keyboard control, and the observer web server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `config.yml` (or `POKER_CLOCK_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Validate the round schedule and build the clock engine
//! 4. Create the shared controller
//! 5. Start the observer server, if enabled
//! 6. Start keyboard control, the terminal face, and the Ctrl-C handler
//! 7. Run the tick driver
//! 8. Log the result, then keep serving the page until stopped

mod error;
mod keyboard;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use pokerclock_core::clock::TournamentClock;
use pokerclock_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, TournamentConfig};
use pokerclock_core::operator::{ClockController, ClockEndReason};
use pokerclock_core::runner;
use pokerclock_observer::{AppState, ServerConfig, spawn_observer};
use tokio::task::JoinError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the clock.
///
/// # Errors
///
/// Returns an error if the configuration or schedule is invalid or the
/// observer cannot bind its port. The clock never starts in that case.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config();

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    let level = config
        .as_ref()
        .map_or("info", |c| c.logging.level.as_str());
    init_tracing(level);

    let config = config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;
    info!(
        tournament = config.tournament.name,
        tick_interval_ms = config.tournament.tick_interval_ms,
        "pokerclock-engine starting"
    );

    // 3. Validate the schedule and build the engine.
    let schedule = config
        .schedule()
        .map_err(EngineError::from)
        .inspect_err(|e| error!(error = %e, "Invalid round schedule"))?;
    info!(
        rounds = schedule.len(),
        total_seconds = schedule.total_duration_secs(),
        "Schedule loaded"
    );
    let clock = TournamentClock::new(schedule).map_err(EngineError::from)?;

    // 4. Shared controller.
    let controller = Arc::new(ClockController::new(
        clock,
        config.tournament.name.clone(),
        config.tournament.tick_interval_ms,
    ));

    // 5. Observer server.
    let observer = if config.observer.enabled {
        let state = Arc::new(AppState::new(Arc::clone(&controller)));
        let handle = spawn_observer(&ServerConfig::from(&config.observer), state)
            .await
            .map_err(EngineError::from)?;
        info!(url = %format!("http://{}/", handle.addr), "Clock page available");
        Some(handle)
    } else {
        info!("Observer disabled");
        None
    };

    // 6. Keyboard, terminal face, and Ctrl-C.
    tokio::spawn(keyboard::run_keyboard(
        Arc::clone(&controller),
        keyboard::spawn_stdin_reader(),
    ));
    let renderer = tokio::spawn(terminal::run_renderer(Arc::clone(&controller)));
    {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received");
                controller.request_stop();
            }
        });
    }
    info!("Clock paused. Press Enter to start or pause, q to quit");

    // 7. Run the tick driver.
    let result = runner::run_clock(&controller).await;

    // 8. Log results.
    runner::log_run_end(&result);
    check_task_exit("terminal renderer", renderer.await);

    if let Some(observer) = observer {
        if result.end_reason == ClockEndReason::TournamentComplete {
            info!("Tournament complete. Page stays up until q or Ctrl-C");
            controller.wait_for_stop().await;
        }
        check_task_exit("observer server", observer.task.await);
    }

    info!(
        end_reason = ?result.end_reason,
        ticks_applied = result.ticks_applied,
        "pokerclock-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` applies. Logs
/// go to stderr so stdout stays free for the clock face.
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Path of the configuration file.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the tournament configuration.
///
/// A missing file yields the defaults, whose schedule is empty, so the
/// run still fails at validation with a clear message.
fn load_config() -> Result<TournamentConfig, EngineError> {
    let path = config_path();
    if path.exists() {
        Ok(TournamentConfig::from_file(&path)?)
    } else {
        let mut config = TournamentConfig::default();
        config.observer.apply_env_overrides();
        Ok(config)
    }
}

/// Log a background task that panicked or was cancelled.
///
/// Returns `true` if the task finished cleanly.
fn check_task_exit(task: &str, result: Result<(), JoinError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(task, error = %e, panicked = e.is_panic(), "Background task failed");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_task_exit_passes() {
        let handle = tokio::spawn(async {});
        assert!(check_task_exit("idle", handle.await));
    }

    #[tokio::test]
    async fn panicked_task_is_reported() {
        let handle = tokio::spawn(async { panic!("renderer blew up") });
        assert!(!check_task_exit("renderer", handle.await));
    }

    #[tokio::test]
    async fn aborted_task_is_reported() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        assert!(!check_task_exit("observer", handle.await));
    }
}
