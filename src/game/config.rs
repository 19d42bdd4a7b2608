//! Game Configuration
//!
//! Range and round count for a game, validated before any commitments are
//! generated. Immutable once a game starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_RANGE, DEFAULT_ROUNDS};

/// Configuration for one game: secrets are drawn from `[1, range]` across
/// `rounds` rounds.
///
/// Invariant: both fields are at least 1 and `rounds <= range`. Secrets
/// within a batch are unique, so a game cannot have more rounds than there
/// are distinct values to draw, or the generator would loop forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Upper bound of the secret range (inclusive, lower bound is 1).
    pub range: u32,
    /// Number of rounds per game.
    pub rounds: u32,
}

impl GameConfig {
    /// Create a validated configuration.
    pub fn new(range: u32, rounds: u32) -> Result<Self, ConfigError> {
        let config = Self { range, rounds };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.range < 1 {
            return Err(ConfigError::RangeTooSmall);
        }
        if self.rounds < 1 {
            return Err(ConfigError::RoundsTooSmall);
        }
        if self.rounds > self.range {
            return Err(ConfigError::RoundsExceedRange {
                rounds: self.rounds,
                range: self.range,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            range: DEFAULT_RANGE,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Configuration validation errors.
///
/// These are user-input failures, never crashes: the engine reports them and
/// leaves state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Range must be a positive number.
    #[error("Range must be at least 1")]
    RangeTooSmall,

    /// Round count must be a positive number.
    #[error("Number of rounds must be at least 1")]
    RoundsTooSmall,

    /// More rounds than distinct values in range.
    #[error("Number of rounds ({rounds}) cannot exceed the range ({range})")]
    RoundsExceedRange {
        /// Requested rounds.
        rounds: u32,
        /// Configured range.
        range: u32,
    },
}

// =============================================================================
// TESTS
// =============================================================================
