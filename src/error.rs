//! Error taxonomy for snapshot computation.
//!
//! | Error | Scope | Recovery |
//! |-------|-------|----------|
//! | [`StructuralError`] | stream or snapshot declaration | fatal, nothing is processed |
//! | [`MemberError`] | one version-record | skipped during selection |
//! | [`ConsistencyError`] | combining two snapshots | fatal for the combine only |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Iri;

/// A required single-valued fact of a stream or snapshot declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fact {
    /// The `ldes:EventStream` typed subject.
    EventStream,
    /// `ldes:versionOfPath`.
    VersionPath,
    /// `ldes:timestampPath`.
    TimestampPath,
    /// `ldes:snapshotOf`.
    SnapshotOf,
    /// `ldes:snapshotUntil`.
    SnapshotUntil,
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventStream => write!(f, "event stream"),
            Self::VersionPath => write!(f, "versionOfPath"),
            Self::TimestampPath => write!(f, "timestampPath"),
            Self::SnapshotOf => write!(f, "snapshotOf"),
            Self::SnapshotUntil => write!(f, "snapshotUntil"),
        }
    }
}

/// The stream or snapshot declaration is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// A single-valued fact occurs zero or several times.
    #[error("Expected exactly one {fact} for {subject}, found {found}")]
    Cardinality {
        /// The fact being read.
        fact: Fact,
        /// Subject the fact was read from (`graph` for the stream lookup).
        subject: String,
        /// Number of values present.
        found: usize,
    },
    /// A fact is present but has an unusable value.
    #[error("Invalid {fact} for {subject}: {reason}")]
    InvalidFact {
        /// The fact being read.
        fact: Fact,
        /// Subject the fact was read from.
        subject: String,
        /// What is wrong with the value.
        reason: String,
    },
}

/// A single version-record cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberError {
    /// The member does not carry exactly one statement for a path.
    #[error("Member {member}: expected exactly one {path} statement, found {found}")]
    Cardinality {
        /// Member id.
        member: String,
        /// Path predicate that was followed.
        path: Iri,
        /// Number of statements present.
        found: usize,
    },
    /// The timestamp value is not an `xsd:dateTime`.
    #[error("Member {member}: timestamp {value} is not a valid xsd:dateTime")]
    InvalidTimestamp {
        /// Member id.
        member: String,
        /// Offending value.
        value: String,
    },
    /// The object id is a literal.
    #[error("Member {member}: object identifier {value} is not an IRI or blank node")]
    InvalidObjectId {
        /// Member id.
        member: String,
        /// Offending value.
        value: String,
    },
}

impl MemberError {
    /// The id of the member that failed.
    pub fn member(&self) -> &str {
        match self {
            Self::Cardinality { member, .. }
            | Self::InvalidTimestamp { member, .. }
            | Self::InvalidObjectId { member, .. } => member,
        }
    }
}

/// Two snapshots cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    /// The snapshots were taken of different event streams.
    #[error("Cannot combine snapshots of different streams: {base} and {incremental}")]
    SourceMismatch {
        /// Source stream of the base snapshot.
        base: String,
        /// Source stream of the incremental snapshot.
        incremental: String,
    },
    /// One of the snapshots is materialized.
    #[error("Cannot combine materialized snapshot {snapshot}")]
    Materialized {
        /// Id of the materialized snapshot.
        snapshot: String,
    },
    /// The snapshots navigate their members through different paths.
    #[error("Cannot combine snapshots with different paths: {base} and {incremental}")]
    PathMismatch {
        /// Paths of the base snapshot.
        base: String,
        /// Paths of the incremental snapshot.
        incremental: String,
    },
}

/// Any failure surfaced by the snapshot operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Structural error in a declaration.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// Member error that could not be skipped.
    #[error(transparent)]
    Member(#[from] MemberError),
    /// Consistency error while combining.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}
