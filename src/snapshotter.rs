//! Snapshots of an event stream held in a graph store.
//!
//! ```text
//! graph -> MemberExtractor -> members -> select -> SnapshotAssembler -> Snapshot / events
//! ```
//!
//! The current time is read once per top-level call (`snapshot`,
//! `events`, `create`, `create_incremental`) and threaded through
//! explicitly; the `*_at` variants take it as an argument.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::combine::combine_snapshots;
use crate::error::{ConsistencyError, SnapshotError, StructuralError};
use crate::metadata::{
    declared_paths, event_stream_id, Snapshot, SnapshotAssembler, SnapshotHeader, SnapshotMetadataParser,
    SnapshotStream,
};
use crate::options::SnapshotOptions;
use crate::selector::{select, Selection, SelectorConfig};
use crate::slicer::{MemberExtractor, Members};
use crate::store::{GraphStore, InMemoryGraphStore};
use crate::types::{Term, VersionPaths, VersionedMember};

/// Computes snapshots of one event stream.
pub struct Snapshotter<'a, S: GraphStore> {
    store: &'a S,
    stream_id: Term,
}

impl<'a, S: GraphStore> Snapshotter<'a, S> {
    /// Snapshotter for the single `ldes:EventStream` in `store`.
    pub fn new(store: &'a S) -> Result<Self, StructuralError> {
        let stream_id = event_stream_id(store)?;
        Ok(Self { store, stream_id })
    }

    /// Snapshotter for an explicitly given stream.
    pub fn for_stream(store: &'a S, stream_id: Term) -> Self {
        Self { store, stream_id }
    }

    /// Id of the source stream.
    pub fn stream_id(&self) -> &Term {
        &self.stream_id
    }

    /// Paths declared on the source stream.
    pub fn declared_paths(&self) -> Result<VersionPaths, StructuralError> {
        declared_paths(self.store, &self.stream_id)
    }

    /// Members of the source stream, extracted lazily.
    pub fn members(&self) -> Members<'a, S> {
        MemberExtractor::new(self.store).members(&self.stream_id)
    }

    /// Resolve options against the source stream.
    pub fn resolve(&self, options: &SnapshotOptions, now: DateTime<Utc>) -> Result<SnapshotHeader, StructuralError> {
        options.resolve(&self.stream_id, || self.declared_paths(), now)
    }

    fn select(&self, header: &SnapshotHeader) -> Selection {
        select(&SelectorConfig::from(header), self.members())
    }

    /// Compute a snapshot as of now (unless the options set a cutoff).
    pub fn snapshot(&self, options: &SnapshotOptions) -> Result<Snapshot, StructuralError> {
        self.snapshot_at(options, Utc::now())
    }

    /// Compute a snapshot, using `now` as the default cutoff.
    ///
    /// Structural errors abort before any member is read. Malformed
    /// members are skipped.
    pub fn snapshot_at(&self, options: &SnapshotOptions, now: DateTime<Utc>) -> Result<Snapshot, StructuralError> {
        let header = self.resolve(options, now)?;
        let selection = self.select(&header);
        let snapshot = SnapshotAssembler::new(header).assemble(selection);

        info!(
            stream = %self.stream_id,
            snapshot = %snapshot.id(),
            cutoff = %snapshot.cutoff(),
            members = snapshot.len(),
            materialized = snapshot.is_materialized(),
            "Snapshot computed"
        );
        Ok(snapshot)
    }

    /// Stream the snapshot: header first, then one record per object.
    pub fn events(
        &self,
        options: &SnapshotOptions,
    ) -> Result<SnapshotStream<std::vec::IntoIter<VersionedMember>>, StructuralError> {
        self.events_at(options, Utc::now())
    }

    /// Stream the snapshot, using `now` as the default cutoff.
    ///
    /// Selection must see every member before the best version of an
    /// object is known, so records become available once the pass is done.
    pub fn events_at(
        &self,
        options: &SnapshotOptions,
        now: DateTime<Utc>,
    ) -> Result<SnapshotStream<std::vec::IntoIter<VersionedMember>>, StructuralError> {
        let header = self.resolve(options, now)?;
        let selection = self.select(&header);
        Ok(SnapshotAssembler::new(header).stream(selection))
    }

    /// Compute the snapshot and assemble its output graph.
    pub fn create(&self, options: &SnapshotOptions) -> Result<InMemoryGraphStore, StructuralError> {
        Ok(self.snapshot(options)?.to_graph())
    }

    /// Compute a snapshot and combine it with a previously assembled one.
    pub fn create_incremental<B: GraphStore>(
        &self,
        options: &SnapshotOptions,
        base_graph: &B,
    ) -> Result<Snapshot, SnapshotError> {
        self.create_incremental_at(options, base_graph, Utc::now())
    }

    /// Incremental variant of [`Snapshotter::snapshot_at`].
    ///
    /// The base graph must hold a non-materialized snapshot of this
    /// stream.
    pub fn create_incremental_at<B: GraphStore>(
        &self,
        options: &SnapshotOptions,
        base_graph: &B,
        now: DateTime<Utc>,
    ) -> Result<Snapshot, SnapshotError> {
        let base = SnapshotMetadataParser::parse(base_graph)?;
        if base.source_stream_id() != &self.stream_id {
            return Err(ConsistencyError::SourceMismatch {
                base: base.source_stream_id().to_string(),
                incremental: self.stream_id.to_string(),
            }
            .into());
        }

        let snapshot = self.snapshot_at(options, now)?;
        Ok(combine_snapshots(base, snapshot)?)
    }
}
