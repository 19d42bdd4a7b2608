//! Network Layer
//!
//! WebSocket service surface for the guess engine. This layer is
//! **non-deterministic**: all game logic runs through `game/`, and each
//! game instance is guarded by a per-session lock so concurrent guesses are
//! serialized in arrival order.

pub mod protocol;
pub mod server;
pub mod session;

pub use protocol::{ClientMessage, ErrorCode, ProtocolError, ServerMessage};
pub use server::{GameServer, GameServerError, ServerConfig};
pub use session::{GameSession, SessionId, SessionManager};
