//! Read-Only Projections
//!
//! What the host UI sees: the history table, the aggregate counters, and the
//! human-readable message for the most recent action. Messages are derived
//! from outcomes and never stored as authoritative state.

use serde::{Deserialize, Serialize};

use crate::game::engine::GuessOutcome;
use crate::game::state::{GamePhase, GameState};

/// One row of the history table.
///
/// Unresolved rounds expose only the published hash; the secret and nonce
/// appear once the round has resolved, so the player can audit the reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// Zero-based round index.
    pub index: usize,
    /// The published commitment hash.
    pub hash: String,
    /// The player's guess, once submitted.
    pub guess: Option<u32>,
    /// Whether this round's secret has been revealed.
    pub revealed: bool,
    /// Whether the guess matched, once resolved.
    pub correct: Option<bool>,
    /// The revealed secret (resolved rounds only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<u32>,
    /// The revealed nonce (resolved rounds only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Read-only snapshot of a game for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Current lifecycle phase.
    pub phase: GamePhase,
    /// Secret range upper bound.
    pub range: u32,
    /// Total rounds in the game.
    pub total_rounds: u32,
    /// Index of the round awaiting a guess.
    pub current_round: usize,
    /// Running score.
    pub score: u32,
    /// Whether all rounds have resolved.
    pub game_over: bool,
    /// One row per round, ordered by round index.
    pub history: Vec<HistoryRow>,
}

impl GameView {
    /// Project a state into its read-only view.
    pub fn of(state: &GameState) -> Self {
        let history = state
            .rounds
            .iter()
            .enumerate()
            .map(|(index, record)| HistoryRow {
                index,
                hash: record.commitment.hash.clone(),
                guess: record.guess,
                revealed: record.resolved,
                correct: record.correct,
                secret: record.resolved.then_some(record.commitment.secret),
                nonce: record.resolved.then(|| record.commitment.nonce.clone()),
            })
            .collect();

        Self {
            phase: state.phase,
            range: state.config.range,
            total_rounds: state.rounds.len() as u32,
            current_round: state.current_round,
            score: state.score,
            game_over: state.is_over(),
            history,
        }
    }
}

/// Message shown when a game starts.
pub fn start_message() -> String {
    "Guess the number for hash #1".to_string()
}

/// Derive the human-readable message for a resolved round.
pub fn outcome_message(outcome: &GuessOutcome) -> String {
    match (outcome.correct, outcome.game_over) {
        (true, true) => format!("Game over! Final score: {}/{}", outcome.score, outcome.rounds),
        (true, false) => format!("Correct! Try hash #{}", outcome.round + 2),
        (false, true) => format!(
            "Game over! The number was {}. Final score: {}/{}",
            outcome.secret, outcome.score, outcome.rounds
        ),
        (false, false) => format!(
            "Wrong! The number was {}. Try hash #{}",
            outcome.secret,
            outcome.round + 2
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================
