//! Canonical content of a statement set for deterministic hashing.
//!
//! ## Canonical Content Format
//!
//! The canonical form of a member's statements is:
//!
//! ```text
//! canonical_content(statements) = UTF-8(join("\n", sort(dedup(canonical_line(s) for s in statements))))
//! ```
//!
//! so the hash depends only on the set of statements, never on the order
//! in which extraction or selection produced them.
//!
//! ## What Is NOT Included
//!
//! - The member id on its own (it appears only through its statements)
//! - Selection metadata (object id, timestamp, snapshot header)

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::types::Statement;

/// Version of the canonical content format.
///
/// Changes to this version invalidate all existing content hashes.
pub const CANONICAL_CONTENT_VERSION: &str = "1.0.0";

/// Convert a statement set to canonical bytes for hashing.
pub fn canonical_content<'a, I>(statements: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let lines: BTreeSet<String> = statements
        .into_iter()
        .map(Statement::canonical_line)
        .collect();
    lines.into_iter().collect::<Vec<_>>().join("\n").into_bytes()
}

/// Compute the SHA-256 content hash of a statement set.
///
/// Returned as a 64-character lowercase hex string.
pub fn compute_content_hash<'a, I>(statements: I) -> String
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut hasher = Sha256::new();
    hasher.update(canonical_content(statements));
    hex::encode(hasher.finalize())
}

/// Verify that a content hash matches a statement set.
///
/// Uses constant-time comparison.
pub fn verify_content_hash<'a, I>(statements: I, expected_hash: &str) -> bool
where
    I: IntoIterator<Item = &'a Statement>,
{
    let computed = compute_content_hash(statements);

    if computed.len() != expected_hash.len() {
        return false;
    }

    computed
        .bytes()
        .zip(expected_hash.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
