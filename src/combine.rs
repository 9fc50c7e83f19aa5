//! Combining two snapshots of the same event stream.
//!
//! The snapshot with the later cutoff is the incremental one; the other is
//! the base. Their members are concatenated, base first, and selected
//! again at the incremental cutoff. This is a full recomputation over both
//! member sets, not a delta merge.

use tracing::info;

use crate::error::{ConsistencyError, SnapshotError};
use crate::metadata::{Snapshot, SnapshotMetadataParser};
use crate::selector::{select_versioned, SelectorConfig};
use crate::store::GraphStore;

/// Combine two non-materialized snapshots of the same stream.
///
/// On equal cutoffs `first` is the base. The result carries the
/// incremental snapshot's id, cutoff and paths.
pub fn combine_snapshots(first: Snapshot, second: Snapshot) -> Result<Snapshot, ConsistencyError> {
    if first.source_stream_id() != second.source_stream_id() {
        return Err(ConsistencyError::SourceMismatch {
            base: first.source_stream_id().to_string(),
            incremental: second.source_stream_id().to_string(),
        });
    }
    for snapshot in [&first, &second] {
        if snapshot.is_materialized() {
            return Err(ConsistencyError::Materialized {
                snapshot: snapshot.id().to_string(),
            });
        }
    }
    if first.paths() != second.paths() {
        return Err(ConsistencyError::PathMismatch {
            base: first.paths().to_string(),
            incremental: second.paths().to_string(),
        });
    }

    let (base, incremental) = if first.cutoff() > second.cutoff() {
        (second, first)
    } else {
        (first, second)
    };

    info!(
        base = %base.id(),
        base_members = base.len(),
        incremental = %incremental.id(),
        incremental_members = incremental.len(),
        cutoff = %incremental.cutoff(),
        "Combining snapshots"
    );

    let (header, incremental_members) = incremental.into_parts();
    let (_, base_members) = base.into_parts();
    let selection = select_versioned(
        &SelectorConfig::from(&header),
        base_members.into_iter().chain(incremental_members),
    );

    Ok(Snapshot::new(header, selection.into_members()))
}

/// Parse two snapshot graphs and combine them.
pub fn combine_snapshot_graphs<A, B>(first: &A, second: &B) -> Result<Snapshot, SnapshotError>
where
    A: GraphStore,
    B: GraphStore,
{
    let first = SnapshotMetadataParser::parse(first)?;
    let second = SnapshotMetadataParser::parse(second)?;
    Ok(combine_snapshots(first, second)?)
}
