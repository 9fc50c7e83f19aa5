//! # version-snapshot
//!
//! Point-in-time snapshots of versioned, append-only graph event streams.
//!
//! An event stream is a collection of immutable version-records. Each
//! record describes one historical state of a stable object at a known
//! timestamp. A snapshot answers one question:
//!
//! > As of a cutoff, which version of every object is current?
//!
//! ## Core Contract
//!
//! 1. Slice the stream graph into self-contained members
//! 2. Per object id, select the member with the greatest timestamp not after the cutoff
//! 3. Assemble the selection into an output graph, optionally materialized
//!
//! ## Architecture
//!
//! ```text
//! graph → MemberExtractor → members → SnapshotSelector → SnapshotAssembler → Snapshot
//!                                           ↑                                   │
//!                                           └──────── combine_snapshots ────────┘
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same options + same `now` → identical snapshot fingerprint
//! - Selection depends only on (object id, timestamp) pairs and the cutoff,
//!   except for equal timestamps of one object, where the first member
//!   processed wins
//! - Members are ordered by object id

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod canonical_content;
pub mod combine;
pub mod error;
pub mod materialize;
pub mod metadata;
pub mod options;
pub mod selector;
pub mod slicer;
pub mod snapshotter;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod vocab;

// Re-exports
pub use types::{Iri, Literal, Member, Statement, Term, VersionPaths, VersionedMember};
pub use error::{ConsistencyError, Fact, MemberError, SnapshotError, StructuralError};
pub use store::{GraphStore, InMemoryGraphStore};
pub use slicer::{MemberExtractor, Members};
pub use selector::{select, select_versioned, Offer, Selection, SelectionStats, SelectorConfig, SnapshotSelector};
pub use materialize::Materializer;
pub use metadata::{
    declared_paths, event_stream_id, object_id_of_materialized, Snapshot, SnapshotAssembler, SnapshotEvent,
    SnapshotHeader, SnapshotMetadataParser, SnapshotStream,
};
pub use options::{default_snapshot_id, SnapshotOptions};
pub use combine::{combine_snapshot_graphs, combine_snapshots};
pub use snapshotter::Snapshotter;
pub use telemetry::{init_tracing, try_init_tracing, LogFormat};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use canonical_content::{canonical_content, compute_content_hash, verify_content_hash, CANONICAL_CONTENT_VERSION};

/// Schema version of snapshot fingerprints.
/// Increment on changes to what a fingerprint covers.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";
