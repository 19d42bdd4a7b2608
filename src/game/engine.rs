//! Guess Engine
//!
//! The round state machine: `start` publishes a fresh batch of commitments,
//! `submit_guess` resolves exactly one round per accepted guess, and `reset`
//! returns to `NotStarted`. Transitions are all-or-nothing; any error leaves
//! the state byte-for-byte unchanged.

use thiserror::Error;

use crate::core::nonce::NonceClock;
use crate::core::rng::DeterministicRng;
use crate::game::commitment::{generate_commitments, Commitment};
use crate::game::config::{ConfigError, GameConfig};
use crate::game::events::GameEvent;
use crate::game::state::{GamePhase, GameState, RoundRecord};

/// Result of an accepted guess, including the now-revealed secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    /// Zero-based index of the round that resolved.
    pub round: usize,
    /// The accepted guess.
    pub guess: u32,
    /// Whether the recomputed hash matched the commitment.
    pub correct: bool,
    /// The revealed secret for the resolved round.
    pub secret: u32,
    /// The revealed nonce, for auditing the commitment.
    pub nonce: String,
    /// Running score after this round.
    pub score: u32,
    /// Total rounds in the game.
    pub rounds: u32,
    /// Whether this was the final round.
    pub game_over: bool,
}

/// Guess validation errors. The guess is rejected and no round is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    /// Input did not parse as an integer.
    #[error("`{input}` is not a number")]
    NotANumber {
        /// The raw input as received.
        input: String,
    },

    /// Parsed value is outside the configured range.
    #[error("Guess {got} is outside the range [{min}, {max}]")]
    OutOfRange {
        /// Lower bound (always 1).
        min: u32,
        /// Upper bound (the configured range).
        max: u32,
        /// The rejected value.
        got: i64,
    },
}

/// Errors returned by engine transitions.
///
/// All of these are recoverable by the caller: the engine never panics and
/// never leaves a partially applied transition behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Invalid configuration at `start`.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unparsable or out-of-range guess at `submit_guess`.
    #[error(transparent)]
    Guess(#[from] GuessError),

    /// A pre-generated commitment batch does not match its configuration.
    #[error("commitment batch does not match the configuration")]
    BatchMismatch,

    /// The requested action is not valid in the current phase.
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        /// The rejected action.
        action: &'static str,
        /// Phase the game was in.
        phase: GamePhase,
    },
}

/// Start a game: validate the config, generate commitments, enter `Playing`.
///
/// Valid from `NotStarted` and from `Over` (playing again regenerates
/// everything: new secrets, new nonces, never reused). Starting while a game
/// is in progress is an [`EngineError::InvalidTransition`]; a
/// [`ConfigError`] leaves the state exactly as it was.
pub fn start(
    state: &mut GameState,
    config: GameConfig,
    rng: &mut DeterministicRng,
    clock: &mut impl NonceClock,
) -> Result<(), EngineError> {
    if state.is_playing() {
        return Err(EngineError::InvalidTransition {
            action: "start",
            phase: state.phase,
        });
    }

    let commitments = generate_commitments(config, rng, clock)?;
    begin(state, config, commitments);
    Ok(())
}

/// Start a game from a pre-generated commitment batch.
///
/// Entry point for resuming a persisted game or replaying a recorded one.
/// The batch is validated against the config: correct length, secrets in
/// range and pairwise distinct, hashes consistent with their secret and
/// nonce.
pub fn start_with_commitments(
    state: &mut GameState,
    config: GameConfig,
    commitments: Vec<Commitment>,
) -> Result<(), EngineError> {
    if state.is_playing() {
        return Err(EngineError::InvalidTransition {
            action: "start",
            phase: state.phase,
        });
    }

    config.validate()?;

    if commitments.len() != config.rounds as usize {
        return Err(EngineError::BatchMismatch);
    }

    let mut seen = std::collections::BTreeSet::new();
    for c in &commitments {
        let in_range = (1..=config.range).contains(&c.secret);
        if !in_range || !seen.insert(c.secret) || !c.matches_guess(c.secret) {
            return Err(EngineError::BatchMismatch);
        }
    }

    begin(state, config, commitments);
    Ok(())
}

/// Install a validated batch and enter `Playing`.
fn begin(state: &mut GameState, config: GameConfig, commitments: Vec<Commitment>) {
    state.config = config;
    state.rounds = commitments.into_iter().map(RoundRecord::new).collect();
    state.current_round = 0;
    state.score = 0;
    state.phase = GamePhase::Playing;
    state.push_event(GameEvent::GameStarted {
        range: config.range,
        rounds: config.rounds,
    });
}

/// Submit a guess for the current round.
///
/// Parses `raw` as an integer and range-checks it; on any validation
/// failure the state is unchanged and no round is consumed. An accepted
/// guess resolves the current round exactly once: correct or not, the
/// round index advances. This is a single-shot guess game, not an
/// iterative-narrowing one.
pub fn submit_guess(state: &mut GameState, raw: &str) -> Result<GuessOutcome, EngineError> {
    if !state.is_playing() {
        return Err(EngineError::InvalidTransition {
            action: "submit a guess",
            phase: state.phase,
        });
    }

    let guess = parse_guess(raw, state.config.range)?;

    let index = state.current_round;
    let record = match state.rounds.get_mut(index) {
        Some(record) => record,
        // Unreachable while the phase invariant holds; refuse rather than panic.
        None => {
            return Err(EngineError::InvalidTransition {
                action: "submit a guess",
                phase: state.phase,
            })
        }
    };

    // The comparison uses the round's stored nonce, never a fresh one.
    let correct = record.commitment.matches_guess(guess);
    record.resolve(guess, correct);

    let secret = record.commitment.secret;
    let nonce = record.commitment.nonce.clone();

    if correct {
        state.score += 1;
    }
    state.current_round += 1;

    let game_over = state.current_round == state.rounds.len();
    if game_over {
        state.phase = GamePhase::Over;
    }

    let outcome = GuessOutcome {
        round: index,
        guess,
        correct,
        secret,
        nonce,
        score: state.score,
        rounds: state.rounds.len() as u32,
        game_over,
    };

    state.push_event(GameEvent::RoundResolved {
        round: index,
        guess,
        secret,
        correct,
        score: state.score,
    });
    if game_over {
        state.push_event(GameEvent::GameOver {
            score: state.score,
            rounds: outcome.rounds,
        });
    }

    Ok(outcome)
}

/// Reset to `NotStarted`, discarding all rounds.
///
/// Always safe, from any phase: abandoning a game mid-play is allowed, and a
/// subsequent `start` regenerates fresh commitments.
pub fn reset(state: &mut GameState) {
    state.rounds.clear();
    state.current_round = 0;
    state.score = 0;
    state.phase = GamePhase::NotStarted;
    state.push_event(GameEvent::GameReset);
}

/// Parse and range-check a raw guess.
fn parse_guess(raw: &str, range: u32) -> Result<u32, GuessError> {
    let value: i64 = raw.trim().parse().map_err(|_| GuessError::NotANumber {
        input: raw.to_string(),
    })?;

    if value < 1 || value > range as i64 {
        return Err(GuessError::OutOfRange {
            min: 1,
            max: range,
            got: value,
        });
    }

    Ok(value as u32)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nonce::FixedNonceClock;
    use proptest::prelude::*;

    /// Start a playing state with the given secrets sealed under fixed nonces.
    fn playing_state(range: u32, secrets: &[u32]) -> GameState {
        let config = GameConfig {
            range,
            rounds: secrets.len() as u32,
        };
        let commitments: Vec<Commitment> = secrets
            .iter()
            .enumerate()
            .map(|(i, &s)| Commitment::seal(s, format!("170000000000000{i}")))
            .collect();

        let mut state = GameState::new();
        start_with_commitments(&mut state, config, commitments).unwrap();
        state
    }

    fn seeded_start(state: &mut GameState, config: GameConfig, seed: u64) -> Result<(), EngineError> {
        let mut rng = DeterministicRng::new(seed);
        let mut clock = FixedNonceClock::new(1_700_000_000_000_000);
        start(state, config, &mut rng, &mut clock)
    }

    #[test]
    fn test_start_enters_playing() {
        let mut state = GameState::new();
        seeded_start(&mut state, GameConfig { range: 10, rounds: 3 }, 1).unwrap();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rounds.len(), 3);
        assert_eq!(state.current_round, 0);
        assert_eq!(state.score, 0);
        assert!(state.current_commitment().is_some());
    }

    #[test]
    fn test_start_with_invalid_config_leaves_not_started() {
        // Scenario: range=5, attempts=10 at start.
        let mut state = GameState::new();
        let before = state.clone();

        let result = seeded_start(&mut state, GameConfig { range: 5, rounds: 10 }, 1);
        assert_eq!(
            result,
            Err(EngineError::Config(ConfigError::RoundsExceedRange {
                rounds: 10,
                range: 5
            }))
        );
        assert_eq!(state, before);
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_start_while_playing_rejected() {
        let mut state = playing_state(10, &[7, 2, 9]);
        let before = state.clone();

        let result = seeded_start(&mut state, GameConfig { range: 10, rounds: 3 }, 2);
        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { action: "start", .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_play_again_from_over_regenerates() {
        let mut state = playing_state(10, &[4]);
        submit_guess(&mut state, "4").unwrap();
        assert!(state.is_over());

        let first_hashes: Vec<String> =
            state.rounds.iter().map(|r| r.commitment.hash.clone()).collect();

        // Starting again from Over is allowed and produces a fresh batch.
        seeded_start(&mut state, GameConfig { range: 10, rounds: 3 }, 7).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.rounds.len(), 3);

        let second_hashes: Vec<String> =
            state.rounds.iter().map(|r| r.commitment.hash.clone()).collect();
        assert_ne!(first_hashes, second_hashes);
    }

    #[test]
    fn test_reference_walkthrough() {
        // Scenario: range=10, rounds=3, secrets [7, 2, 9], guesses [7, 5, 9].
        let mut state = playing_state(10, &[7, 2, 9]);

        let first = submit_guess(&mut state, "7").unwrap();
        assert!(first.correct);
        assert_eq!(first.secret, 7);
        assert_eq!(first.score, 1);
        assert!(!first.game_over);

        let second = submit_guess(&mut state, "5").unwrap();
        assert!(!second.correct);
        assert_eq!(second.secret, 2);
        assert_eq!(second.score, 1);
        assert!(!second.game_over);

        let third = submit_guess(&mut state, "9").unwrap();
        assert!(third.correct);
        assert_eq!(third.score, 2);
        assert!(third.game_over);

        assert!(state.is_over());
        assert_eq!(state.score, 2);
        assert_eq!(state.current_round, 3);
    }

    #[test]
    fn test_unparsable_guess_is_idempotent() {
        // Scenario: range=10, rounds=1, guess input "abc".
        let mut state = playing_state(10, &[6]);
        let before = state.clone();

        let result = submit_guess(&mut state, "abc");
        assert_eq!(
            result,
            Err(EngineError::Guess(GuessError::NotANumber {
                input: "abc".to_string()
            }))
        );

        assert_eq!(state, before);
        assert_eq!(state.current_round, 0);
        assert!(!state.rounds[0].resolved);
    }

    #[test]
    fn test_out_of_range_guess_rejected() {
        let mut state = playing_state(10, &[6]);
        let before = state.clone();

        for raw in ["0", "11", "-3", "4294967296"] {
            let result = submit_guess(&mut state, raw);
            assert!(
                matches!(result, Err(EngineError::Guess(GuessError::OutOfRange { .. }))),
                "{raw} should be out of range"
            );
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_boundary_guesses_accepted() {
        let mut state = playing_state(10, &[1, 10]);

        let low = submit_guess(&mut state, "1").unwrap();
        assert!(low.correct);

        let high = submit_guess(&mut state, "10").unwrap();
        assert!(high.correct);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let mut state = playing_state(10, &[3]);
        let outcome = submit_guess(&mut state, " 3 ").unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn test_incorrect_guess_still_advances() {
        let mut state = playing_state(10, &[7, 2]);

        let outcome = submit_guess(&mut state, "1").unwrap();
        assert!(!outcome.correct);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.score, 0);
        assert!(state.rounds[0].resolved);
    }

    #[test]
    fn test_repeated_guess_across_rounds_permitted() {
        let mut state = playing_state(10, &[7, 5]);

        submit_guess(&mut state, "5").unwrap();
        let outcome = submit_guess(&mut state, "5").unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn test_guess_after_game_over_rejected() {
        let mut state = playing_state(10, &[4]);
        submit_guess(&mut state, "4").unwrap();
        assert!(state.is_over());

        let before = state.clone();
        let result = submit_guess(&mut state, "4");
        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition {
                phase: GamePhase::Over,
                ..
            })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_guess_before_start_rejected() {
        let mut state = GameState::new();
        let result = submit_guess(&mut state, "5");
        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition {
                phase: GamePhase::NotStarted,
                ..
            })
        ));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut state = playing_state(10, &[7, 2, 9]);
        submit_guess(&mut state, "7").unwrap();

        reset(&mut state);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.rounds.is_empty());
        assert_eq!(state.current_round, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_events_emitted_in_order() {
        let mut state = playing_state(10, &[4]);
        state.take_events();

        submit_guess(&mut state, "4").unwrap();
        let events = state.take_events();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::RoundResolved { correct: true, .. }));
        assert!(matches!(events[1], GameEvent::GameOver { score: 1, rounds: 1 }));
    }

    #[test]
    fn test_full_width_range_starts() {
        // A range of u32::MAX is a valid configuration; starting must cost
        // memory proportional to the round count, not the range.
        let mut state = GameState::new();
        seeded_start(&mut state, GameConfig { range: u32::MAX, rounds: 3 }, 6).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rounds.len(), 3);

        let batch = vec![
            Commitment::seal(1, "1".to_string()),
            Commitment::seal(u32::MAX, "2".to_string()),
        ];
        let mut resumed = GameState::new();
        start_with_commitments(&mut resumed, GameConfig { range: u32::MAX, rounds: 2 }, batch)
            .unwrap();
        assert_eq!(resumed.phase, GamePhase::Playing);
    }

    #[test]
    fn test_start_with_commitments_validates_batch() {
        let config = GameConfig { range: 10, rounds: 2 };

        // Duplicate secrets rejected
        let dupes = vec![
            Commitment::seal(3, "1".to_string()),
            Commitment::seal(3, "2".to_string()),
        ];
        let mut state = GameState::new();
        assert!(start_with_commitments(&mut state, config, dupes).is_err());

        // Out-of-range secret rejected
        let oob = vec![
            Commitment::seal(3, "1".to_string()),
            Commitment::seal(11, "2".to_string()),
        ];
        assert!(start_with_commitments(&mut state, config, oob).is_err());

        // Tampered hash rejected
        let mut tampered = vec![
            Commitment::seal(3, "1".to_string()),
            Commitment::seal(4, "2".to_string()),
        ];
        tampered[1].hash = "deadbeef".to_string();
        assert!(start_with_commitments(&mut state, config, tampered).is_err());

        // Wrong batch length rejected
        let short = vec![Commitment::seal(3, "1".to_string())];
        assert!(start_with_commitments(&mut state, config, short).is_err());
    }

    // =========================================================================
    // PROPERTY TESTS
    // =========================================================================

    proptest! {
        /// Hash match iff exact value match, for every guess in range.
        #[test]
        fn prop_soundness(range in 1u32..=200, seed in any::<u64>()) {
            let config = GameConfig { range, rounds: 1 };
            let mut rng = DeterministicRng::new(seed);
            let mut clock = FixedNonceClock::new(1_700_000_000_000_000);
            let batch = generate_commitments(config, &mut rng, &mut clock).unwrap();
            let commitment = &batch[0];

            for guess in 1..=range {
                prop_assert_eq!(commitment.matches_guess(guess), guess == commitment.secret);
            }
        }

        /// Score and round index stay bounded for arbitrary guess sequences,
        /// and the index advances by exactly one per accepted guess.
        #[test]
        fn prop_progress_and_score_bound(
            seed in any::<u64>(),
            rounds in 1u32..=10,
            guesses in proptest::collection::vec(any::<i64>(), 0..20),
        ) {
            let config = GameConfig { range: 20, rounds };
            let mut state = GameState::new();
            seeded_start(&mut state, config, seed).unwrap();

            for raw in guesses {
                let before_round = state.current_round;
                let accepted = submit_guess(&mut state, &raw.to_string()).is_ok();

                if accepted {
                    prop_assert_eq!(state.current_round, before_round + 1);
                } else {
                    prop_assert_eq!(state.current_round, before_round);
                }

                prop_assert!(state.score as usize <= state.current_round);
                prop_assert!(state.current_round <= state.rounds.len());
                prop_assert_eq!(state.is_over(), state.current_round == state.rounds.len());

                if state.is_over() {
                    break;
                }
            }
        }

        /// A resolved round's `correct` flag always equals the recomputed
        /// hash comparison against the stored commitment.
        #[test]
        fn prop_resolved_rounds_consistent(seed in any::<u64>(), guesses in proptest::collection::vec(1i64..=20, 1..10)) {
            let config = GameConfig { range: 20, rounds: 5 };
            let mut state = GameState::new();
            seeded_start(&mut state, config, seed).unwrap();

            for raw in guesses {
                if submit_guess(&mut state, &raw.to_string()).is_err() {
                    break;
                }
            }

            for record in state.rounds.iter().filter(|r| r.resolved) {
                let guess = record.guess.unwrap();
                prop_assert_eq!(record.correct, Some(record.commitment.matches_guess(guess)));
            }
        }
    }
}
