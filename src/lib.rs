//! # Hashguess Game Server
//!
//! Commit-reveal number guessing engine with an authoritative game server.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HASHGUESS SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - Rolling-hash commitment primitive         │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── nonce.rs    - Monotonic per-round nonce clocks          │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── config.rs   - Game configuration and validation         │
//! │  ├── commitment.rs - Secret batch generation                 │
//! │  ├── state.rs    - Round records and game state              │
//! │  ├── engine.rs   - start / submit_guess / reset transitions  │
//! │  ├── events.rs   - Events emitted by transitions             │
//! │  └── projection.rs - Read-only views for the host UI         │
//! │                                                              │
//! │  network/        - Networking (non-deterministic)            │
//! │  ├── server.rs   - WebSocket server                          │
//! │  ├── protocol.rs - Message types                             │
//! │  └── session.rs  - Per-game session management               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commit-Reveal Guarantee
//!
//! All round secrets are drawn and sealed into commitments before the first
//! guess is accepted. A guess is checked by recomputing the commitment hash
//! from the guess and the round's **stored** nonce and comparing against the
//! published hash; the secret is only revealed once its round resolves, so a
//! player can audit after the fact that nothing was swapped mid-game.
//!
//! The `core/` and `game/` modules are deterministic given the injected RNG
//! seed and nonce clock: the same seed and clock reproduce the same batch of
//! commitments on any platform. The `network/` layer is the only
//! non-deterministic shell.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::core::hash::{commit_hash, rolling_hash, HASH_MODULUS};
pub use crate::core::nonce::{FixedNonceClock, NonceClock, SystemNonceClock};
pub use crate::core::rng::DeterministicRng;
pub use crate::game::config::{ConfigError, GameConfig};
pub use crate::game::engine::{EngineError, GuessError, GuessOutcome};
pub use crate::game::state::{GamePhase, GameState, RoundRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number range (secrets drawn from `[1, DEFAULT_RANGE]`)
pub const DEFAULT_RANGE: u32 = 10;

/// Default number of rounds per game
pub const DEFAULT_ROUNDS: u32 = 3;
