//! Game State Definitions
//!
//! The single state record that replaces the original per-round parallel
//! arrays: every round owns its commitment, guess, and resolution together,
//! so there is no index to get out of step.

use serde::{Deserialize, Serialize};

use crate::game::commitment::Commitment;
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;

/// Lifecycle phase of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No commitments exist; waiting for `start`.
    #[default]
    NotStarted,
    /// Guesses are being accepted.
    Playing,
    /// All rounds resolved; only `reset` or a fresh `start` are valid.
    Over,
}

/// One round of a game: a commitment plus its (at most one) resolution.
///
/// Created unresolved at game start and mutated exactly once, by the guess
/// that resolves it. Never mutated again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// The sealed secret for this round.
    pub commitment: Commitment,
    /// The player's guess, once submitted.
    pub guess: Option<u32>,
    /// Whether this round has been resolved.
    pub resolved: bool,
    /// Whether the guess's hash matched the commitment, once resolved.
    pub correct: Option<bool>,
}

impl RoundRecord {
    /// Create an unresolved round around a commitment.
    pub fn new(commitment: Commitment) -> Self {
        Self {
            commitment,
            guess: None,
            resolved: false,
            correct: None,
        }
    }

    /// Record this round's one and only resolution.
    pub fn resolve(&mut self, guess: u32, correct: bool) {
        self.guess = Some(guess);
        self.resolved = true;
        self.correct = Some(correct);
    }
}

/// Complete state of one game instance.
///
/// Owned exclusively by the guess engine; callers see read-only projections.
/// Every transition is all-or-nothing: on any validation error the state is
/// left untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Configuration the game was started with.
    pub config: GameConfig,

    /// Current lifecycle phase.
    pub phase: GamePhase,

    /// All rounds, ordered by round index. Empty while `NotStarted`.
    pub rounds: Vec<RoundRecord>,

    /// Index of the round awaiting a guess. Equal to `rounds.len()` once
    /// the game is over.
    pub current_round: usize,

    /// Count of correct guesses so far. Never exceeds `current_round`.
    pub score: u32,

    /// Events generated by transitions since the last `take_events`.
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh, not-yet-started game with default configuration.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            phase: GamePhase::NotStarted,
            rounds: Vec::new(),
            current_round: 0,
            score: 0,
            pending_events: Vec::new(),
        }
    }

    /// Whether all rounds have resolved.
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Whether a guess is currently being accepted.
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// The commitment awaiting a guess, if any.
    pub fn current_commitment(&self) -> Option<&Commitment> {
        if self.is_playing() {
            self.rounds.get(self.current_round).map(|r| &r.commitment)
        } else {
            None
        }
    }

    /// Total rounds in the current game.
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GameState {
    // Pending events are transient; two states are equal when the durable
    // record is equal.
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.phase == other.phase
            && self.rounds == other.rounds
            && self.current_round == other.current_round
            && self.score == other.score
    }
}

impl Eq for GameState {}

// =============================================================================
// TESTS
// =============================================================================
