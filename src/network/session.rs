//! Game Session Management
//!
//! One session per connected player, owning that player's `GameState`
//! together with its injected RNG and nonce clock. Sessions live behind a
//! per-instance `RwLock`, so concurrent calls against one game are
//! serialized in arrival order; the engine itself assumes single-writer
//! access.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use crate::core::nonce::SystemNonceClock;
use crate::core::rng::DeterministicRng;
use crate::game::config::GameConfig;
use crate::game::engine::{self, EngineError, GuessOutcome};
use crate::game::projection::{self, GameView};
use crate::game::state::GameState;

/// Unique session identifier.
pub type SessionId = [u8; 16];

/// A single player's game session.
pub struct GameSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// The game state owned by this session.
    state: GameState,
    /// Injected randomness for commitment generation.
    rng: DeterministicRng,
    /// Injected nonce clock for commitment generation.
    clock: SystemNonceClock,
    /// When the session was created.
    created_at: Instant,
    /// Last time a message touched this session.
    last_activity: Instant,
}

impl GameSession {
    /// Create a new session, seeding its RNG from the session id plus
    /// wall-clock entropy.
    pub fn new(id: SessionId) -> Self {
        let entropy = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self::with_rng(id, DeterministicRng::for_session(&id, entropy))
    }

    /// Create a session with an explicit RNG (deterministic tests/replays).
    pub fn with_rng(id: SessionId, rng: DeterministicRng) -> Self {
        let now = Instant::now();
        Self {
            id,
            state: GameState::new(),
            rng,
            clock: SystemNonceClock::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Start a new game on this session.
    pub fn start(&mut self, range: u32, rounds: u32) -> Result<GameView, EngineError> {
        let config = GameConfig { range, rounds };
        engine::start(&mut self.state, config, &mut self.rng, &mut self.clock)?;
        Ok(self.view())
    }

    /// Submit a raw guess for the current round.
    pub fn guess(&mut self, raw: &str) -> Result<GuessOutcome, EngineError> {
        engine::submit_guess(&mut self.state, raw)
    }

    /// Abandon the current game.
    pub fn reset(&mut self) -> GameView {
        engine::reset(&mut self.state);
        self.view()
    }

    /// Read-only snapshot of the current state.
    pub fn view(&self) -> GameView {
        GameView::of(&self.state)
    }

    /// Prompt message for a freshly started game.
    pub fn start_message(&self) -> String {
        projection::start_message()
    }

    /// Record activity (called on every handled message).
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// How long since this session last saw a message.
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Session age.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

/// Manages all active sessions.
pub struct SessionManager {
    /// Active sessions.
    sessions: RwLock<BTreeMap<SessionId, Arc<RwLock<GameSession>>>>,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a new session and return its id.
    pub async fn create_session(&self) -> SessionId {
        let id = uuid::Uuid::new_v4().into_bytes();
        let session = GameSession::new(id);

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, Arc::new(RwLock::new(session)));

        id
    }

    /// Get a session by id.
    pub async fn get_session(&self, id: &SessionId) -> Option<Arc<RwLock<GameSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    /// Remove a session.
    pub async fn remove_session(&self, id: &SessionId) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
    }

    /// Number of active sessions.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Drop sessions idle longer than `max_idle`. Returns how many were
    /// removed.
    pub async fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut to_remove = Vec::new();

        for (id, session) in sessions.iter() {
            let s = session.read().await;
            if s.idle_for() > max_idle {
                to_remove.push(*id);
            }
        }

        for id in &to_remove {
            sessions.remove(id);
        }

        to_remove.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GamePhase;

    fn seeded_session(seed: u64) -> GameSession {
        GameSession::with_rng([7; 16], DeterministicRng::new(seed))
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let mut session = seeded_session(1);

        let view = session.start(10, 3).unwrap();
        assert_eq!(view.phase, GamePhase::Playing);
        assert_eq!(view.total_rounds, 3);
        assert_eq!(view.history.len(), 3);

        let view = session.reset();
        assert_eq!(view.phase, GamePhase::NotStarted);
        assert!(view.history.is_empty());
    }

    #[tokio::test]
    async fn test_session_full_game() {
        let mut session = seeded_session(2);
        session.start(10, 2).unwrap();

        // Whatever the secrets are, two guesses end the game.
        session.guess("1").unwrap();
        let second = session.guess("2").unwrap();
        assert!(second.game_over);
        assert!(session.view().game_over);
    }

    #[tokio::test]
    async fn test_session_accepts_full_width_range() {
        // Range arrives unbounded from the wire; a maximal value must start
        // a game without range-proportional allocation.
        let mut session = seeded_session(5);

        let view = session.start(u32::MAX, 3).unwrap();
        assert_eq!(view.phase, GamePhase::Playing);
        assert_eq!(view.history.len(), 3);
    }

    #[tokio::test]
    async fn test_session_rejects_bad_config() {
        let mut session = seeded_session(3);

        assert!(session.start(5, 10).is_err());
        assert_eq!(session.view().phase, GamePhase::NotStarted);
    }

    #[tokio::test]
    async fn test_invalid_guess_leaves_view_unchanged() {
        let mut session = seeded_session(4);
        session.start(10, 1).unwrap();

        let before = session.view();
        assert!(session.guess("not a number").is_err());
        assert_eq!(session.view(), before);
    }

    #[tokio::test]
    async fn test_manager_create_get_remove() {
        let manager = SessionManager::new();

        let id = manager.create_session().await;
        assert_eq!(manager.session_count().await, 1);
        assert!(manager.get_session(&id).await.is_some());

        manager.remove_session(&id).await;
        assert_eq!(manager.session_count().await, 0);
        assert!(manager.get_session(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_idle_keeps_active_sessions() {
        let manager = SessionManager::new();
        let id = manager.create_session().await;

        // Fresh session is not idle
        let removed = manager.cleanup_idle(Duration::from_secs(60)).await;
        assert_eq!(removed, 0);
        assert!(manager.get_session(&id).await.is_some());

        // Zero tolerance removes it
        let removed = manager.cleanup_idle(Duration::ZERO).await;
        assert_eq!(removed, 1);
        assert!(manager.get_session(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_guesses_serialized() {
        let manager = SessionManager::new();
        let id = manager.create_session().await;
        let session = manager.get_session(&id).await.unwrap();

        session.write().await.start(100, 10).unwrap();

        // Fire guesses from several tasks; the per-session lock must
        // serialize them so exactly ten are accepted.
        let mut handles = Vec::new();
        for _ in 0..4 {
            let session = session.clone();
            handles.push(tokio::spawn(async move {
                let mut accepted = 0;
                for guess in 1..=5 {
                    if session.write().await.guess(&guess.to_string()).is_ok() {
                        accepted += 1;
                    }
                }
                accepted
            }));
        }

        let mut total_accepted = 0;
        for handle in handles {
            total_accepted += handle.await.unwrap();
        }

        assert_eq!(total_accepted, 10);
        let view = session.read().await.view();
        assert!(view.game_over);
        assert_eq!(view.current_round, 10);
    }
}
