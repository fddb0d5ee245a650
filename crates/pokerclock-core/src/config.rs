//! Configuration loading and typed config structures for the tournament clock.
//!
//! The configuration lives in a YAML file (`config.yml` in the working
//! directory by default, or the path in the `POKER_CLOCK_CONFIG`
//! environment variable). This module defines strongly-typed structs that
//! mirror the YAML structure and a loader that reads the file.
//!
//! The `rounds` list is kept as untyped YAML here and validated by
//! [`TournamentConfig::schedule`], so a bad round is reported with its
//! position and field instead of as a YAML parse error.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::schedule::{Schedule, ValidationError};

/// Config file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "POKER_CLOCK_CONFIG";

/// Environment variable overriding `observer.host`.
pub const OBSERVER_HOST_ENV: &str = "POKER_CLOCK_HOST";

/// Environment variable overriding `observer.port`.
pub const OBSERVER_PORT_ENV: &str = "POKER_CLOCK_PORT";

/// Smallest accepted tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The tick interval is too small to drive a clock.
    #[error("tournament.tick_interval_ms must be at least 10, got {value}")]
    InvalidTickInterval {
        /// The rejected interval.
        value: u64,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level clock configuration.
///
/// Mirrors the structure of `config.yml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TournamentConfig {
    /// Tournament-level settings (name, tick cadence).
    #[serde(default)]
    pub tournament: TournamentSection,

    /// Raw round entries, validated by [`TournamentConfig::schedule`].
    #[serde(default)]
    pub rounds: Vec<serde_yml::Value>,

    /// Observer web server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TournamentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the observer
    /// address:
    /// - `POKER_CLOCK_HOST` overrides `observer.host`
    /// - `POKER_CLOCK_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidTickInterval`] for a too-small tick interval.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Same as [`TournamentConfig::from_file`], minus I/O.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // A blank file is an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.observer.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialization alone cannot.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tournament.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::InvalidTickInterval {
                value: self.tournament.tick_interval_ms,
            });
        }
        Ok(())
    }

    /// Validate the configured rounds into a [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: an empty list, a
    /// missing or mistyped field, or a non-positive duration.
    pub fn schedule(&self) -> Result<Schedule, ValidationError> {
        Schedule::from_yaml_values(&self.rounds)
    }
}

/// Tournament-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TournamentSection {
    /// Human-readable tournament name, shown as the page title.
    #[serde(default = "default_tournament_name")]
    pub name: String,

    /// Real-time milliseconds per tick. One tick consumes one second of
    /// round time, so anything other than 1000 runs the clock fast or slow.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for TournamentSection {
    fn default() -> Self {
        Self {
            name: default_tournament_name(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Observer web server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Whether to serve the clock page and API.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl ObserverConfig {
    /// Override fields from `POKER_CLOCK_HOST` / `POKER_CLOCK_PORT`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// An unparseable port is ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(OBSERVER_HOST_ENV) {
            self.host = host;
        }
        if let Some(raw) = lookup(OBSERVER_PORT_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid POKER_CLOCK_PORT override"),
            }
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (trace, debug, info, warn, error). `RUST_LOG`
    /// takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde requires function paths)
// ---------------------------------------------------------------------------

fn default_tournament_name() -> String {
    String::from("Poker Tournament")
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_observer_host() -> String {
    String::from("127.0.0.1")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = TournamentConfig::default();
        assert_eq!(config.tournament.name, "Poker Tournament");
        assert_eq!(config.tournament.tick_interval_ms, 1000);
        assert!(config.rounds.is_empty());
        assert!(config.observer.enabled);
        assert_eq!(config.observer.port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
tournament:
  name: "Friday Night Poker"
  tick_interval_ms: 500

rounds:
  - number: 1
    name: "Blinds 25/50"
    duration: 900
  - number: 2
    name: "Break"
    duration: 300
    is_break: true
  - number: 3
    name: "Blinds 50/100"
    duration: 900

observer:
  enabled: false
  host: "0.0.0.0"
  port: 9090

logging:
  level: "debug"
"#;

        let config = TournamentConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.tournament.name, "Friday Night Poker");
        assert_eq!(config.tournament.tick_interval_ms, 500);
        assert_eq!(config.rounds.len(), 3);
        assert!(!config.observer.enabled);
        assert_eq!(config.logging.level, "debug");

        let schedule = config.schedule();
        assert!(schedule.is_ok());
        let schedule = schedule.ok();
        assert_eq!(schedule.as_ref().map(Schedule::len), Some(3));
        assert_eq!(
            schedule.as_ref().and_then(|s| s.get(1).ok()).map(|r| r.is_break),
            Some(true)
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "rounds:\n  - { number: 1, name: Level 1, duration: 60 }\n";
        let config = TournamentConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Everything but the rounds uses defaults
        assert_eq!(config.tournament.tick_interval_ms, 1000);
        assert_eq!(config.observer.host, "127.0.0.1");
        assert!(config.schedule().is_ok());
    }

    #[test]
    fn parse_empty_yaml_yields_empty_schedule_error() {
        let config = TournamentConfig::parse("");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.schedule(), Err(ValidationError::Empty));
    }

    #[test]
    fn bad_round_is_reported_by_schedule_not_parse() {
        let yaml = "rounds:\n  - { number: 1, name: Level 1, duration: 0 }\n";
        let config = TournamentConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(
            config.schedule(),
            Err(ValidationError::NonPositiveDuration {
                index: 0,
                duration: 0
            })
        );
    }

    #[test]
    fn too_small_tick_interval_is_rejected() {
        let result = TournamentConfig::parse("tournament:\n  tick_interval_ms: 5\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidTickInterval { value: 5 })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = TournamentConfig::parse("rounds: [unclosed\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn env_overrides_apply_to_observer() {
        let mut observer = ObserverConfig::default();
        observer.apply_overrides_from(|key| match key {
            OBSERVER_HOST_ENV => Some(String::from("0.0.0.0")),
            OBSERVER_PORT_ENV => Some(String::from("9191")),
            _ => None,
        });
        assert_eq!(observer.host, "0.0.0.0");
        assert_eq!(observer.port, 9191);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut observer = ObserverConfig::default();
        observer.apply_overrides_from(|key| {
            (key == OBSERVER_PORT_ENV).then(|| String::from("not-a-port"))
        });
        assert_eq!(observer.port, 8080);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_PATH);
        if path.exists() {
            let config = TournamentConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            let schedule = config.ok().map(|c| c.schedule());
            assert!(
                matches!(schedule, Some(Ok(_))),
                "Project config has an invalid schedule: {schedule:?}"
            );
        }
    }
}
