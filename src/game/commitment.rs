//! Commitment Generation
//!
//! Produces the batch of sealed secrets a game is played against: one unique
//! secret, one nonce, and one commitment hash per round, all fixed before the
//! first guess is accepted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::hash::commit_hash;
use crate::core::nonce::NonceClock;
use crate::core::rng::DeterministicRng;
use crate::game::config::{ConfigError, GameConfig};

/// A sealed secret for one round.
///
/// Created at game start, immutable thereafter. The `secret` field is
/// logically hidden from the player until the round resolves; only `hash`
/// is published up front.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// The secret number, in `[1, range]`.
    pub secret: u32,
    /// Per-round nonce mixed into the hash.
    pub nonce: String,
    /// Published commitment hash over `(secret, last4(secret), nonce)`.
    pub hash: String,
}

impl Commitment {
    /// Seal a secret with a nonce, computing its commitment hash.
    pub fn seal(secret: u32, nonce: String) -> Self {
        let hash = commit_hash(secret, &nonce);
        Self { secret, nonce, hash }
    }

    /// Check a guess against this commitment.
    ///
    /// Recomputes the candidate hash from the guess and this round's
    /// **stored** nonce and compares it to the published hash. The nonce is
    /// never regenerated here: a mismatched nonce must always fail the
    /// match, which is the soundness property of the scheme.
    pub fn matches_guess(&self, guess: u32) -> bool {
        commit_hash(guess, &self.nonce) == self.hash
    }
}

/// Generate the commitment batch for a game.
///
/// Draws candidate secrets uniformly from `[1, range]`, rejecting
/// duplicates, until `rounds` unique secrets are sealed. Each accepted
/// secret gets a fresh nonce from `clock` at time of acceptance.
///
/// Fails fast with a [`ConfigError`] on an invalid configuration instead of
/// looping: the caller-facing invariant `rounds <= range` is what guarantees
/// the draw space never empties.
pub fn generate_commitments(
    config: GameConfig,
    rng: &mut DeterministicRng,
    clock: &mut impl NonceClock,
) -> Result<Vec<Commitment>, ConfigError> {
    config.validate()?;

    // Memory here must scale with rounds, never with range: the range is
    // client-supplied and can be the full u32 width.
    let mut drawn = BTreeSet::new();
    let mut batch = Vec::with_capacity(config.rounds as usize);

    while batch.len() < config.rounds as usize {
        let secret = rng.next_secret(config.range);
        if !drawn.insert(secret) {
            continue;
        }
        batch.push(Commitment::seal(secret, clock.next_nonce()));
    }

    Ok(batch)
}

// =============================================================================
// TESTS
// =============================================================================
