//! Caller pseudo-identity derivation.
//!
//! A caller is identified by the hex SHA-256 digest of their raw
//! `User-Agent` value. The scheme is deliberately weak and is part of the
//! service contract: deterministic, unauthenticated, and collision-prone
//! across clients that share a user-agent string. The digest is both the
//! storage key and the lookup key, nothing more.

use sha2::{Digest, Sha256};

/// Derives the pseudo-identity for a raw `User-Agent` value. An absent
/// header is treated as the empty string, which hashes like any other.
pub fn identity_for(user_agent: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hex::encode(hasher.finalize())
}
