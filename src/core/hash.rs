//! Commitment Hash Primitive
//!
//! The rolling hash that seals a secret into a published commitment. Its
//! mixing function, input layout, and modulus are frozen: any previously
//! published commitment must verify against a freshly computed hash, so the
//! function here must never change.
//!
//! This is **not** a cryptographic commitment. The tiny modulus makes
//! preimages easy to brute-force for small ranges; it binds the secret in an
//! auditable way but does not hide it from a determined adversary. For
//! stake-bearing deployments, [`secure_commit_hash`] provides a SHA-256
//! commitment over a random nonce instead.

use sha2::{Digest, Sha256};

/// Modulus of the rolling hash accumulator.
pub const HASH_MODULUS: u64 = 1_000_000_007;

/// Domain separator for the hardened commitment variant.
const SECURE_COMMIT_DOMAIN: &[u8] = b"HASHGUESS_COMMIT_V1";

/// Compute the rolling hash of a string.
///
/// Seeds an accumulator at 0 and folds each character (by code point, left
/// to right) as `acc = (acc * 31 + codepoint) mod 1_000_000_007`, then
/// renders the accumulator as lowercase hex without zero-padding.
///
/// # Example
///
/// ```
/// use hashguess::core::hash::rolling_hash;
///
/// assert_eq!(rolling_hash("abc"), "17862"); // Frozen output
/// ```
pub fn rolling_hash(input: &str) -> String {
    let mut acc: u64 = 0;
    for c in input.chars() {
        acc = (acc * 31 + c as u64) % HASH_MODULUS;
    }
    format!("{acc:x}")
}

/// The last four decimal digits of `value`, zero-left-padded to width 4.
///
/// `7` becomes `"0007"`, `12345` becomes `"2345"`.
pub fn last4_digits(value: u32) -> String {
    let digits = value.to_string();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].to_string()
    } else {
        format!("{digits:0>4}")
    }
}

/// Build the exact commitment input string for a secret and nonce.
///
/// Layout is the decimal digits of the secret, then the secret's last four
/// digits padded to width 4, then the nonce, with no separators. This
/// concatenation is part of the frozen wire format.
pub fn commitment_input(secret: u32, nonce: &str) -> String {
    format!("{}{}{}", secret, last4_digits(secret), nonce)
}

/// Compute the commitment hash for a secret bound to a nonce.
pub fn commit_hash(secret: u32, nonce: &str) -> String {
    rolling_hash(&commitment_input(secret, nonce))
}

/// Compute a hardened SHA-256 commitment for a secret and a random nonce.
///
/// The drop-in replacement for [`commit_hash`] once real stakes ride on a
/// game: with a 32-byte random nonce the commitment is both binding and
/// hiding. The engine does not use this; it exists so a hardened deployment
/// does not have to invent its own layout.
pub fn secure_commit_hash(secret: u32, nonce: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SECURE_COMMIT_DOMAIN);
    hasher.update(secret.to_le_bytes());
    hasher.update(nonce);
    hasher.finalize().into()
}

/// Verify a hardened commitment against a revealed secret and nonce.
pub fn verify_secure_commit(commitment: &[u8; 32], secret: u32, nonce: &[u8]) -> bool {
    secure_commit_hash(secret, nonce) == *commitment
}

// =============================================================================
// TESTS
// =============================================================================
