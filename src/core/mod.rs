//! Core deterministic primitives.
//!
//! Everything in this module is reproducible bit-for-bit given the same
//! inputs. The game layer builds on these to make whole games replayable.

pub mod hash;
pub mod nonce;
pub mod rng;

// Re-export core types
pub use hash::{commit_hash, rolling_hash, HASH_MODULUS};
pub use nonce::{FixedNonceClock, NonceClock, SystemNonceClock};
pub use rng::DeterministicRng;
