//! Snapshot headers and assembled snapshots.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::options::SnapshotOptions;
use crate::store::InMemoryGraphStore;
use crate::types::{Iri, Statement, Term, VersionPaths, VersionedMember};
use crate::{vocab, SNAPSHOT_SCHEMA_VERSION};

/// Identity and configuration of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Snapshot id (the output collection or stream).
    pub id: Term,
    /// Id of the event stream the snapshot was taken of.
    pub source_stream_id: Term,
    /// Latest timestamp included.
    pub cutoff: DateTime<Utc>,
    /// Paths used to read members.
    pub paths: VersionPaths,
    /// Whether members are materialized.
    pub materialized: bool,
}

impl SnapshotHeader {
    /// Header statements of the output graph.
    ///
    /// A materialized snapshot is a `tree:Collection` declaring what it is a
    /// materialization of. Otherwise the snapshot is itself an
    /// `ldes:EventStream` carrying the paths of its source.
    pub fn statements(&self) -> Vec<Statement> {
        let id = &self.id;
        let fact = |predicate: &str, object: Term| Statement::new(id.clone(), Iri::new(predicate), object);
        let until = Term::date_time(self.cutoff);

        if self.materialized {
            vec![
                fact(vocab::RDF_TYPE, Term::iri(vocab::TREE_COLLECTION)),
                fact(vocab::LDES_VERSION_MATERIALIZATION_OF, self.source_stream_id.clone()),
                fact(vocab::LDES_VERSION_MATERIALIZATION_UNTIL, until),
            ]
        } else {
            vec![
                fact(vocab::RDF_TYPE, Term::iri(vocab::LDES_EVENT_STREAM)),
                fact(vocab::LDES_VERSION_OF_PATH, self.paths.version_path.clone().into()),
                fact(vocab::LDES_TIMESTAMP_PATH, self.paths.timestamp_path.clone().into()),
                fact(vocab::LDES_SNAPSHOT_OF, self.source_stream_id.clone()),
                fact(vocab::LDES_SNAPSHOT_UNTIL, until),
            ]
        }
    }

    /// Containment statement for a selected member.
    ///
    /// Materialized snapshots contain the object id, others the version id.
    pub fn containment(&self, member: &VersionedMember) -> Statement {
        let target = if self.materialized {
            member.object_id()
        } else {
            member.id()
        };
        Statement::new(self.id.clone(), Iri::new(vocab::TREE_MEMBER), target.clone())
    }
}

/// A point-in-time view of an event stream.
///
/// Holds at most one member per object id when produced by selection.
/// Members are ordered by object id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    header: SnapshotHeader,
    members: Vec<VersionedMember>,
}

impl Snapshot {
    /// Create a snapshot from a header and its members.
    ///
    /// Members are put in object id order; the relative order of members
    /// sharing an object id is kept.
    pub fn new(header: SnapshotHeader, mut members: Vec<VersionedMember>) -> Self {
        members.sort_by(|a, b| a.object_id().cmp(b.object_id()));
        Self { header, members }
    }

    /// An empty, non-materialized snapshot of `source`.
    ///
    /// Unset options default to id `http://example.org/<epoch millis>`,
    /// cutoff `now`, timestamp path `dct:created` and version path
    /// `dct:isVersionOf`.
    pub fn initialize(options: &SnapshotOptions, source: Term, now: DateTime<Utc>) -> Self {
        let cutoff = options.cutoff.unwrap_or(now);
        let id = options
            .snapshot_id
            .clone()
            .unwrap_or_else(|| Term::iri(format!("http://example.org/{}", cutoff.timestamp_millis())));
        let paths = VersionPaths::new(
            options
                .version_path
                .clone()
                .unwrap_or_else(|| Iri::new(vocab::DCT_IS_VERSION_OF)),
            options
                .timestamp_path
                .clone()
                .unwrap_or_else(|| Iri::new(vocab::DCT_CREATED)),
        );

        Self::new(
            SnapshotHeader {
                id,
                source_stream_id: source,
                cutoff,
                paths,
                materialized: false,
            },
            Vec::new(),
        )
    }

    /// Header.
    pub fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    /// Snapshot id.
    pub fn id(&self) -> &Term {
        &self.header.id
    }

    /// Id of the source event stream.
    pub fn source_stream_id(&self) -> &Term {
        &self.header.source_stream_id
    }

    /// Cutoff timestamp.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.header.cutoff
    }

    /// Member paths.
    pub fn paths(&self) -> &VersionPaths {
        &self.header.paths
    }

    /// Whether members are materialized.
    pub fn is_materialized(&self) -> bool {
        self.header.materialized
    }

    /// Selected members.
    pub fn members(&self) -> &[VersionedMember] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the snapshot has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member selected for `object_id`.
    pub fn get(&self, object_id: &Term) -> Option<&VersionedMember> {
        self.members
            .binary_search_by(|m| m.object_id().cmp(object_id))
            .ok()
            .map(|i| &self.members[i])
    }

    /// Split into header and members.
    pub fn into_parts(self) -> (SnapshotHeader, Vec<VersionedMember>) {
        (self.header, self.members)
    }

    /// Deterministic fingerprint of header and selection.
    ///
    /// Two snapshots with the same fingerprint selected the same version
    /// for every object, with identical content.
    pub fn fingerprint(&self) -> String {
        let mut members: Vec<(String, String, String)> = self
            .members
            .iter()
            .map(|m| (m.object_id().to_string(), m.id().to_string(), m.member().content_hash()))
            .collect();
        members.sort();

        canonical_hash_hex(&FingerprintInput {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            id: self.header.id.to_string(),
            source_stream_id: self.header.source_stream_id.to_string(),
            cutoff: self.header.cutoff.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            version_path: self.header.paths.version_path.as_str(),
            timestamp_path: self.header.paths.timestamp_path.as_str(),
            materialized: self.header.materialized,
            members,
        })
    }

    /// Assemble the output graph: header statements, one containment
    /// statement per member and the members' statements.
    pub fn to_graph(&self) -> InMemoryGraphStore {
        let mut graph: InMemoryGraphStore = self.header.statements().into_iter().collect();
        for member in &self.members {
            graph.add(self.header.containment(member));
            graph.extend(member.statements().iter().cloned());
        }
        graph
    }
}

/// Internal struct for computing the fingerprint.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    schema_version: &'a str,
    id: String,
    source_stream_id: String,
    cutoff: String,
    version_path: &'a str,
    timestamp_path: &'a str,
    materialized: bool,
    members: Vec<(String, String, String)>,
}
