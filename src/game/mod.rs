//! Game Logic Module
//!
//! All commit-reveal game logic. Deterministic given the injected RNG and
//! nonce clock.
//!
//! ## Module Structure
//!
//! - `config`: Game configuration and validation
//! - `commitment`: Secret batch generation and sealing
//! - `state`: Round records and game state
//! - `engine`: The start / submit_guess / reset state machine
//! - `events`: Events emitted by transitions
//! - `projection`: Read-only views and outcome messages for the host UI

pub mod commitment;
pub mod config;
pub mod engine;
pub mod events;
pub mod projection;
pub mod state;

// Re-export key types
pub use commitment::{generate_commitments, Commitment};
pub use config::{ConfigError, GameConfig};
pub use engine::{reset, start, start_with_commitments, submit_guess};
pub use engine::{EngineError, GuessError, GuessOutcome};
pub use events::GameEvent;
pub use projection::{outcome_message, GameView, HistoryRow};
pub use state::{GamePhase, GameState, RoundRecord};
