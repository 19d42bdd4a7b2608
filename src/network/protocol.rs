//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket. Messages are
//! serialized as JSON; flat request structs also support binary (bincode)
//! where a client wants it.

use serde::{Deserialize, Serialize};

use crate::game::engine::{EngineError, GuessOutcome};
use crate::game::projection::GameView;

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a new game with the given configuration.
    Start(StartRequest),

    /// Submit a guess for the current round.
    Guess(GuessRequest),

    /// Abandon the current game and return to the start screen.
    Reset,

    /// Request the current game view (for reconnection/refresh).
    Sync,

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: u64,
    },
}

/// Request to start a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Secret range upper bound (1 to range).
    pub range: u32,
    /// Number of rounds.
    pub rounds: u32,
}

/// A raw guess as typed by the player.
///
/// Sent unparsed: validation (and the resulting error message) is the
/// engine's job, so web and native clients behave identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    /// The raw input string.
    pub input: String,
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A game started; commitments are published in the view.
    Started {
        /// Snapshot after the start.
        view: GameView,
        /// Prompt for the first round.
        message: String,
    },

    /// A round resolved.
    RoundResolved(RoundResolvedInfo),

    /// Current game view (reply to `Sync`, or after `Reset`).
    State {
        /// Snapshot of the game.
        view: GameView,
    },

    /// A request was rejected; game state is unchanged.
    Error(ProtocolError),

    /// Pong response.
    Pong {
        /// Echoed client timestamp.
        timestamp: u64,
        /// Server wall-clock milliseconds.
        server_time: u64,
    },

    /// Server is shutting down.
    Shutdown {
        /// Reason for shutdown.
        reason: String,
    },
}

/// Everything a client needs to render a resolved round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResolvedInfo {
    /// Zero-based round index.
    pub round: usize,
    /// The accepted guess.
    pub guess: u32,
    /// Whether the guess matched the commitment.
    pub correct: bool,
    /// The revealed secret.
    pub secret: u32,
    /// The revealed nonce, for client-side audit.
    pub nonce: String,
    /// Running score.
    pub score: u32,
    /// Whether this was the final round.
    pub game_over: bool,
    /// Derived human-readable outcome message.
    pub message: String,
    /// Snapshot after the resolution.
    pub view: GameView,
}

impl RoundResolvedInfo {
    /// Build from an engine outcome plus the post-transition view.
    pub fn new(outcome: GuessOutcome, message: String, view: GameView) -> Self {
        Self {
            round: outcome.round,
            guess: outcome.guess,
            correct: outcome.correct,
            secret: outcome.secret,
            nonce: outcome.nonce,
            score: outcome.score,
            game_over: outcome.game_over,
            message,
            view,
        }
    }
}

/// A rejected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid range/rounds at start.
    InvalidConfig,
    /// Unparsable or out-of-range guess.
    InvalidGuess,
    /// Action not valid in the current phase.
    InvalidTransition,
    /// Message could not be parsed.
    InvalidInput,
    /// Internal error.
    InternalError,
}

impl From<&EngineError> for ProtocolError {
    fn from(error: &EngineError) -> Self {
        let code = match error {
            EngineError::Config(_) => ErrorCode::InvalidConfig,
            EngineError::Guess(_) => ErrorCode::InvalidGuess,
            EngineError::BatchMismatch => ErrorCode::InvalidConfig,
            EngineError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
        };
        Self {
            code,
            message: error.to_string(),
        }
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// Tagged enums are not bincode-friendly; binary support stays on the flat
// request structs only.
impl GuessRequest {
    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl StartRequest {
    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
