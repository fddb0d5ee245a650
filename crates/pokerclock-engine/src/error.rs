//! Error types for the clock binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup. Once the clock is running nothing fails.

use pokerclock_core::config::ConfigError;
use pokerclock_core::schedule::ValidationError;
use pokerclock_observer::StartupError;

/// Top-level error for the clock binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The round schedule is invalid.
    #[error("invalid schedule: {source}")]
    Schedule {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// Observer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: StartupError,
    },
}
