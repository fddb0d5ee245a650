//! Line-based keyboard control from the terminal.
//!
//! Stdin is read on a plain OS thread so a pending read never holds up
//! runtime shutdown. Each line becomes a [`KeyCommand`] applied through
//! the shared controller.

use std::io::BufRead;
use std::sync::Arc;

use pokerclock_core::operator::{ClockController, CommandSource};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A command typed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Start if paused, pause if running.
    Toggle,
    /// Start the clock.
    Start,
    /// Pause the clock.
    Pause,
    /// Stop the clock and exit.
    Quit,
}

/// Parse one input line. Enter alone toggles.
pub fn parse_command(line: &str) -> Option<KeyCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "space" | "t" => Some(KeyCommand::Toggle),
        "s" | "start" => Some(KeyCommand::Start),
        "p" | "pause" => Some(KeyCommand::Pause),
        "q" | "quit" => Some(KeyCommand::Quit),
        _ => None,
    }
}

/// Read stdin lines on a background thread.
///
/// The channel closes when stdin reaches end of file.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Apply typed commands until stdin closes, `q` is entered, or the clock
/// is stopped some other way.
pub async fn run_keyboard(controller: Arc<ClockController>, mut lines: mpsc::Receiver<String>) {
    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            () = controller.wait_for_stop() => return,
        };
        let Some(line) = line else {
            debug!("Stdin closed, keyboard control off");
            return;
        };

        match parse_command(&line) {
            Some(KeyCommand::Toggle) => {
                controller.toggle(CommandSource::Keyboard).await;
            }
            Some(KeyCommand::Start) => {
                controller.start(CommandSource::Keyboard).await;
            }
            Some(KeyCommand::Pause) => {
                controller.pause(CommandSource::Keyboard).await;
            }
            Some(KeyCommand::Quit) => {
                info!("Quit requested from keyboard");
                controller.request_stop();
                return;
            }
            None => warn!(input = %line.trim(), "Unknown command (Enter toggles, s, p, q)"),
        }
    }
}
