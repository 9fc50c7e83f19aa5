//! Canonical serialization for deterministic hashing.
//!
//! Used for option hashes and snapshot fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: vectors serialize in index order
//! - No maps keyed by [`Term`](crate::types::Term): JSON object keys must be
//!   strings, so hashed data carries sorted `Vec`s of pairs instead

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// # Panics
///
/// Panics if the value cannot be represented as JSON. Hashed types in this
/// crate are plain structs of strings, numbers and sequences.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
