//! Per-Round Nonce Clocks
//!
//! Every commitment binds its secret to a nonce: a timestamp-like decimal
//! string that differs between rounds. The clock is an injected capability
//! so the game layer never reaches for ambient system time, and tests can
//! replay a batch byte-for-byte.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of per-round nonces.
///
/// Implementations must return a strictly increasing sequence: two rounds in
/// one batch must never share a nonce, or their commitments could collide on
/// equal guesses across rounds.
pub trait NonceClock {
    /// Produce the next nonce string.
    fn next_nonce(&mut self) -> String;
}

/// Wall-clock nonce source with sub-millisecond resolution.
///
/// Returns microseconds since the Unix epoch as a decimal string. If the
/// system clock has not advanced since the previous call (or stepped
/// backwards), the previous value plus one is issued instead, keeping the
/// sequence strictly monotonic.
#[derive(Debug, Default)]
pub struct SystemNonceClock {
    last: u64,
}

impl SystemNonceClock {
    /// Create a new clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceClock for SystemNonceClock {
    fn next_nonce(&mut self) -> String {
        let now_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64;

        self.last = now_micros.max(self.last + 1);
        self.last.to_string()
    }
}

/// Deterministic nonce source for tests and replays.
///
/// Counts up from a fixed starting value, one step per call.
#[derive(Debug, Clone)]
pub struct FixedNonceClock {
    next: u64,
}

impl FixedNonceClock {
    /// Create a clock whose first nonce will be `start`.
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }
}

impl NonceClock for FixedNonceClock {
    fn next_nonce(&mut self) -> String {
        let nonce = self.next;
        self.next += 1;
        nonce.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
