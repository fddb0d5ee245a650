//! The tournament schedule: an ordered, validated list of rounds.
//!
//! A [`Schedule`] is built once at startup from configuration and never
//! changes afterwards. Order defines tournament progression. Every
//! constructor validates its input, so a `Schedule` value always holds at
//! least one round and every round satisfies the [`Round`] invariants.
//!
//! Raw input arrives as [`RoundEntry`] values whose fields are all
//! optional, so that a missing field is reported as a [`ValidationError`]
//! naming the round and field rather than as a generic parse failure.

use pokerclock_types::Round;

/// Problems found while validating schedule input.
///
/// Raised at load time only. Round indices are zero-based positions in
/// the input list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The input contained no rounds.
    #[error("schedule is empty: at least one round is required")]
    Empty,

    /// A round entry is not a key/value mapping.
    #[error("rounds[{index}]: entry must be a mapping")]
    NotAMapping {
        /// Position of the offending entry.
        index: usize,
    },

    /// A required field is absent (or explicitly null).
    #[error("rounds[{index}]: missing required field `{field}`")]
    MissingField {
        /// Position of the offending entry.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field holds a value of the wrong type.
    #[error("rounds[{index}]: field `{field}` must be {expected}")]
    WrongType {
        /// Position of the offending entry.
        index: usize,
        /// Name of the mistyped field.
        field: &'static str,
        /// Description of the accepted type.
        expected: &'static str,
    },

    /// The round duration is zero or negative.
    #[error("rounds[{index}]: duration must be a positive number of seconds, got {duration}")]
    NonPositiveDuration {
        /// Position of the offending entry.
        index: usize,
        /// The rejected duration.
        duration: i64,
    },

    /// The round number is zero or negative.
    #[error("rounds[{index}]: number must be positive, got {number}")]
    NonPositiveNumber {
        /// Position of the offending entry.
        index: usize,
        /// The rejected number.
        number: i64,
    },

    /// The round number does not fit the display range.
    #[error("rounds[{index}]: number {number} is too large")]
    NumberOutOfRange {
        /// Position of the offending entry.
        index: usize,
        /// The rejected number.
        number: i64,
    },

    /// The round name is empty or only whitespace.
    #[error("rounds[{index}]: name must not be empty")]
    EmptyName {
        /// Position of the offending entry.
        index: usize,
    },
}

/// A lookup outside the schedule's bounds.
///
/// The clock engine never produces one while its invariants hold; seeing
/// this error means a logic fault, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("round index {index} out of bounds (schedule has {len} rounds)")]
pub struct IndexError {
    /// The requested index.
    pub index: usize,
    /// Number of rounds in the schedule.
    pub len: usize,
}

/// Unvalidated round input, as read from configuration.
///
/// All fields are optional so that validation, not deserialization,
/// decides what is missing. `is_break` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundEntry {
    /// Display number.
    pub number: Option<i64>,
    /// Round label.
    pub name: Option<String>,
    /// Length in seconds.
    pub duration: Option<i64>,
    /// Break flag.
    pub is_break: Option<bool>,
}

impl RoundEntry {
    /// Read an entry out of an untyped YAML value, checking field types.
    ///
    /// A null field counts as missing. Only type problems are reported
    /// here; value checks happen in [`Schedule::load`].
    pub fn from_yaml(index: usize, value: &serde_yml::Value) -> Result<Self, ValidationError> {
        if value.as_mapping().is_none() {
            return Err(ValidationError::NotAMapping { index });
        }

        let field = |name: &'static str| value.get(name).filter(|v| !v.is_null());

        let number = field("number")
            .map(|v| {
                v.as_i64().ok_or(ValidationError::WrongType {
                    index,
                    field: "number",
                    expected: "an integer",
                })
            })
            .transpose()?;

        let name = field("name")
            .map(|v| {
                v.as_str().map(str::to_owned).ok_or(ValidationError::WrongType {
                    index,
                    field: "name",
                    expected: "a string",
                })
            })
            .transpose()?;

        let duration = field("duration")
            .map(|v| {
                v.as_i64().ok_or(ValidationError::WrongType {
                    index,
                    field: "duration",
                    expected: "an integer number of seconds",
                })
            })
            .transpose()?;

        let is_break = field("is_break")
            .map(|v| {
                v.as_bool().ok_or(ValidationError::WrongType {
                    index,
                    field: "is_break",
                    expected: "a boolean",
                })
            })
            .transpose()?;

        Ok(Self {
            number,
            name,
            duration,
            is_break,
        })
    }

    /// Validate this entry into a [`Round`].
    fn into_round(self, index: usize) -> Result<Round, ValidationError> {
        let number = self.number.ok_or(ValidationError::MissingField {
            index,
            field: "number",
        })?;
        let name = self.name.ok_or(ValidationError::MissingField {
            index,
            field: "name",
        })?;
        let duration = self.duration.ok_or(ValidationError::MissingField {
            index,
            field: "duration",
        })?;

        if number <= 0 {
            return Err(ValidationError::NonPositiveNumber { index, number });
        }
        let number =
            u32::try_from(number).map_err(|_err| ValidationError::NumberOutOfRange { index, number })?;
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
        // Negative values fail the conversion, zero fails the filter.
        let duration = u64::try_from(duration)
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ValidationError::NonPositiveDuration { index, duration })?;

        Ok(Round {
            number,
            name,
            duration,
            is_break: self.is_break.unwrap_or(false),
        })
    }
}

/// Value checks for a round that is already well typed.
fn check_round(index: usize, round: &Round) -> Result<(), ValidationError> {
    if round.number == 0 {
        return Err(ValidationError::NonPositiveNumber { index, number: 0 });
    }
    if round.name.trim().is_empty() {
        return Err(ValidationError::EmptyName { index });
    }
    if round.duration == 0 {
        return Err(ValidationError::NonPositiveDuration { index, duration: 0 });
    }
    Ok(())
}

/// The ordered, immutable list of rounds for one tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    rounds: Vec<Round>,
}

impl Schedule {
    /// Validate raw entries into a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] for an empty input, or the first
    /// per-round problem found (missing field, non-positive duration or
    /// number, empty name).
    pub fn load<I>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = RoundEntry>,
    {
        let rounds = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_round(index))
            .collect::<Result<Vec<_>, _>>()?;

        if rounds.is_empty() {
            return Err(ValidationError::Empty);
        }

        Ok(Self { rounds })
    }

    /// Validate already-typed rounds into a schedule.
    ///
    /// # Errors
    ///
    /// Same as [`Schedule::load`].
    pub fn from_rounds(rounds: Vec<Round>) -> Result<Self, ValidationError> {
        if rounds.is_empty() {
            return Err(ValidationError::Empty);
        }
        for (index, round) in rounds.iter().enumerate() {
            check_round(index, round)?;
        }
        Ok(Self { rounds })
    }

    /// Validate a list of untyped YAML round entries into a schedule.
    ///
    /// # Errors
    ///
    /// Reports wrong field types as [`ValidationError::WrongType`], then
    /// everything [`Schedule::load`] reports.
    pub fn from_yaml_values(values: &[serde_yml::Value]) -> Result<Self, ValidationError> {
        let entries = values
            .iter()
            .enumerate()
            .map(|(index, value)| RoundEntry::from_yaml(index, value))
            .collect::<Result<Vec<_>, _>>()?;
        Self::load(entries)
    }

    /// Look up a round by position.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `index` is past the end.
    pub fn get(&self, index: usize) -> Result<&Round, IndexError> {
        self.rounds.get(index).ok_or(IndexError {
            index,
            len: self.rounds.len(),
        })
    }

    /// Number of rounds.
    pub const fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Always `false` for a constructed schedule.
    pub const fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Whether `index` is the final round.
    pub fn is_last(&self, index: usize) -> bool {
        index.checked_add(1) == Some(self.rounds.len())
    }

    /// All rounds in tournament order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Sum of all round durations in seconds (saturating).
    pub fn total_duration_secs(&self) -> u64 {
        self.rounds
            .iter()
            .fold(0_u64, |acc, round| acc.saturating_add(round.duration))
    }
}
