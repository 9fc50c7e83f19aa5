//! Streaming assembly of snapshots.
//!
//! A [`SnapshotStream`] yields the header statements exactly once, before
//! the first record, and then one record per selected member. Consumers
//! that only need metadata can stop after the first event.

use crate::materialize::Materializer;
use crate::selector::Selection;
use crate::types::{Statement, VersionedMember};

use super::snapshot::{Snapshot, SnapshotHeader};

/// One event of a snapshot stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    /// Header statements; always the first event.
    Header(Vec<Statement>),
    /// A selected member, materialized if the snapshot is.
    Record(VersionedMember),
}

/// Iterator of snapshot events.
pub struct SnapshotStream<I> {
    header: Option<Vec<Statement>>,
    records: I,
    materializer: Option<Materializer>,
}

impl<I> SnapshotStream<I> {
    /// Whether the header event has been emitted.
    pub fn header_emitted(&self) -> bool {
        self.header.is_none()
    }
}

impl<I: Iterator<Item = VersionedMember>> Iterator for SnapshotStream<I> {
    type Item = SnapshotEvent;

    fn next(&mut self) -> Option<SnapshotEvent> {
        if let Some(header) = self.header.take() {
            return Some(SnapshotEvent::Header(header));
        }
        let member = self.records.next()?;
        Some(SnapshotEvent::Record(prepare(self.materializer.as_ref(), member)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let extra = usize::from(self.header.is_some());
        let (lower, upper) = self.records.size_hint();
        (lower + extra, upper.map(|u| u + extra))
    }
}

/// Turns a selection into a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotAssembler {
    header: SnapshotHeader,
    materializer: Option<Materializer>,
}

impl SnapshotAssembler {
    /// Create an assembler; members are materialized if the header says so.
    pub fn new(header: SnapshotHeader) -> Self {
        let materializer = header
            .materialized
            .then(|| Materializer::new(header.paths.clone()));
        Self { header, materializer }
    }

    /// Header of the snapshot being assembled.
    pub fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    /// Stream header and records.
    pub fn stream<I>(&self, selection: I) -> SnapshotStream<I::IntoIter>
    where
        I: IntoIterator<Item = VersionedMember>,
    {
        SnapshotStream {
            header: Some(self.header.statements()),
            records: selection.into_iter(),
            materializer: self.materializer.clone(),
        }
    }

    /// Assemble a complete snapshot from a selection.
    pub fn assemble(&self, selection: Selection) -> Snapshot {
        let members = selection
            .into_iter()
            .map(|m| prepare(self.materializer.as_ref(), m))
            .collect();
        Snapshot::new(self.header.clone(), members)
    }
}

fn prepare(materializer: Option<&Materializer>, member: VersionedMember) -> VersionedMember {
    match materializer {
        Some(materializer) => materializer.apply(member),
        None => member,
    }
}
