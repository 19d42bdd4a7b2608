//! Game Events
//!
//! Events generated by engine transitions, consumed by the network layer for
//! broadcasting and by replay tooling.

use serde::{Deserialize, Serialize};

/// An event emitted by a state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A game started and its commitments were published.
    GameStarted {
        /// Secret range upper bound.
        range: u32,
        /// Number of rounds.
        rounds: u32,
    },

    /// A round resolved against its commitment.
    RoundResolved {
        /// Zero-based round index.
        round: usize,
        /// The submitted guess.
        guess: u32,
        /// The now-revealed secret.
        secret: u32,
        /// Whether the candidate hash matched the commitment.
        correct: bool,
        /// Running score after this round.
        score: u32,
    },

    /// The final round resolved.
    GameOver {
        /// Final score.
        score: u32,
        /// Total rounds played.
        rounds: u32,
    },

    /// The game was abandoned or restarted; all rounds discarded.
    GameReset,
}
