//! Parsing assembled snapshot graphs back into [`Snapshot`]s.
//!
//! Only non-materialized snapshots can be parsed: their members still
//! carry the version and timestamp paths.

use tracing::debug;

use crate::error::{Fact, MemberError, SnapshotError, StructuralError};
use crate::slicer::MemberExtractor;
use crate::store::GraphStore;
use crate::types::{Iri, Term, VersionedMember};
use crate::vocab;

use super::snapshot::{Snapshot, SnapshotHeader};
use super::{declared_paths, event_stream_id, single_date_time, single_node};

/// Parser for non-materialized snapshot graphs.
pub struct SnapshotMetadataParser;

impl SnapshotMetadataParser {
    /// Parse the snapshot declared by the single `ldes:EventStream` of `store`.
    pub fn parse<S: GraphStore>(store: &S) -> Result<Snapshot, SnapshotError> {
        let id = event_stream_id(store)?;
        Self::parse_with_id(store, &id)
    }

    /// Parse the snapshot with the given id.
    ///
    /// Every member must carry exactly one version-path and one
    /// timestamp-path value; unlike selection, a malformed member fails the
    /// whole parse.
    pub fn parse_with_id<S: GraphStore>(store: &S, id: &Term) -> Result<Snapshot, SnapshotError> {
        let header = Self::parse_header(store, id)?;

        let members = MemberExtractor::new(store)
            .members(id)
            .map(|member| VersionedMember::from_member(member, &header.paths))
            .collect::<Result<Vec<_>, MemberError>>()?;

        debug!(snapshot = %id, members = members.len(), "Parsed snapshot");
        Ok(Snapshot::new(header, members))
    }

    /// Parse only the header facts of the snapshot with the given id.
    pub fn parse_header<S: GraphStore>(store: &S, id: &Term) -> Result<SnapshotHeader, StructuralError> {
        let paths = declared_paths(store, id)?;
        let source_stream_id = single_node(store, id, vocab::LDES_SNAPSHOT_OF, Fact::SnapshotOf)?;
        let cutoff = single_date_time(store, id, vocab::LDES_SNAPSHOT_UNTIL, Fact::SnapshotUntil)?;

        Ok(SnapshotHeader {
            id: id.clone(),
            source_stream_id,
            cutoff,
            paths,
            materialized: false,
        })
    }
}

/// The object id of a materialized version.
///
/// Requires exactly one `dct:hasVersion` statement pointing at `version`.
pub fn object_id_of_materialized<S: GraphStore>(store: &S, version: &Term) -> Result<Term, MemberError> {
    let has_version = Iri::new(vocab::DCT_HAS_VERSION);
    match store.subjects(&has_version, version).as_slice() {
        [only] => Ok((*only).clone()),
        other => Err(MemberError::Cardinality {
            member: version.to_string(),
            path: has_version,
            found: other.len(),
        }),
    }
}
