//! Point-in-time version selection.
//!
//! The selector is a fold over a single-use sequence of members. Each
//! member is offered once, in input order; at the end of the pass the
//! best version per object id is returned.
//!
//! ## Rules
//!
//! 1. A member without exactly one version-path and one timestamp-path
//!    value is rejected (logged, counted, skipped)
//! 2. A member newer than the cutoff is discarded as too recent
//! 3. A member replaces the current selection for its object id only when
//!    its timestamp is strictly greater
//!
//! Rule 3 means that on equal timestamps the first member processed wins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::error::MemberError;
use crate::metadata::SnapshotHeader;
use crate::types::{Member, Term, VersionPaths, VersionedMember};

/// Configuration of one selection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Latest timestamp eligible for selection (inclusive).
    pub cutoff: DateTime<Utc>,
    /// Paths used to read object id and timestamp.
    pub paths: VersionPaths,
}

impl SelectorConfig {
    /// Create a new selector configuration.
    pub fn new(cutoff: DateTime<Utc>, paths: VersionPaths) -> Self {
        Self { cutoff, paths }
    }
}

impl From<&SnapshotHeader> for SelectorConfig {
    fn from(header: &SnapshotHeader) -> Self {
        Self::new(header.cutoff, header.paths.clone())
    }
}

/// Outcome of offering one member to the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offer {
    /// First version seen for its object id.
    Selected,
    /// Replaced the previous selection, whose version id is given.
    Replaced {
        /// Version id that was dropped.
        previous: Term,
    },
    /// Timestamp is after the cutoff.
    TooRecent,
    /// An equal or newer version is already selected.
    Superseded,
    /// The member could not be read.
    Rejected(MemberError),
}

/// Counters for one selection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Members offered.
    pub seen: usize,
    /// Members selected for a previously unseen object id.
    pub selected: usize,
    /// Members that replaced an older selection.
    pub replaced: usize,
    /// Members discarded for being after the cutoff.
    pub too_recent: usize,
    /// Members discarded because an equal or newer version was selected.
    pub superseded: usize,
    /// Members rejected as malformed.
    pub rejected: usize,
}

impl SelectionStats {
    fn record(&mut self, offer: &Offer) {
        self.seen += 1;
        match offer {
            Offer::Selected => self.selected += 1,
            Offer::Replaced { .. } => self.replaced += 1,
            Offer::TooRecent => self.too_recent += 1,
            Offer::Superseded => self.superseded += 1,
            Offer::Rejected(_) => self.rejected += 1,
        }
    }
}

/// Streaming selector state for one pass.
///
/// Owns the working map from object id to the selected version. The map
/// is never shared; [`SnapshotSelector::finish`] consumes the selector.
#[derive(Debug)]
pub struct SnapshotSelector {
    config: SelectorConfig,
    selected: BTreeMap<Term, VersionedMember>,
    stats: SelectionStats,
}

impl SnapshotSelector {
    /// Create an empty selector.
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            selected: BTreeMap::new(),
            stats: SelectionStats::default(),
        }
    }

    /// The configuration of this pass.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Offer a raw member.
    pub fn offer(&mut self, member: Member) -> Offer {
        match VersionedMember::from_member(member, &self.config.paths) {
            Ok(versioned) => self.offer_versioned(versioned),
            Err(err) => {
                warn!(member = %err.member(), error = %err, "Skipping member");
                let offer = Offer::Rejected(err);
                self.stats.record(&offer);
                offer
            }
        }
    }

    /// Offer a member whose object id and timestamp are already known.
    pub fn offer_versioned(&mut self, member: VersionedMember) -> Offer {
        let offer = self.place(member);
        self.stats.record(&offer);
        offer
    }

    fn place(&mut self, member: VersionedMember) -> Offer {
        if member.timestamp() > self.config.cutoff {
            return Offer::TooRecent;
        }

        match self.selected.get(member.object_id()) {
            None => {
                debug!(object = %member.object_id(), version = %member.id(), "Selected version");
                self.selected.insert(member.object_id().clone(), member);
                Offer::Selected
            }
            Some(current) if current.timestamp() < member.timestamp() => {
                let previous = current.id().clone();
                debug!(
                    object = %member.object_id(),
                    version = %member.id(),
                    previous = %previous,
                    "Replaced version"
                );
                self.selected.insert(member.object_id().clone(), member);
                Offer::Replaced { previous }
            }
            Some(_) => Offer::Superseded,
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> SelectionStats {
        self.stats
    }

    /// Number of object ids selected so far.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing has been selected yet.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// End the pass.
    pub fn finish(self) -> Selection {
        Selection {
            members: self.selected.into_values().collect(),
            stats: self.stats,
        }
    }
}

/// Result of a selection pass: one member per object id, ordered by
/// object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    members: Vec<VersionedMember>,
    stats: SelectionStats,
}

impl Selection {
    /// Counters of the pass.
    pub fn stats(&self) -> SelectionStats {
        self.stats
    }

    /// Selected members.
    pub fn members(&self) -> &[VersionedMember] {
        &self.members
    }

    /// Number of selected object ids.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Unwrap into the selected members.
    pub fn into_members(self) -> Vec<VersionedMember> {
        self.members
    }
}

impl IntoIterator for Selection {
    type Item = VersionedMember;
    type IntoIter = std::vec::IntoIter<VersionedMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

/// Run a full selection pass over raw members.
pub fn select<I>(config: &SelectorConfig, members: I) -> Selection
where
    I: IntoIterator<Item = Member>,
{
    let span = info_span!(
        "snapshot_select",
        cutoff = %config.cutoff,
        version_path = %config.paths.version_path
    );
    let _guard = span.enter();

    let selector = members
        .into_iter()
        .fold(SnapshotSelector::new(config.clone()), |mut selector, member| {
            selector.offer(member);
            selector
        });
    finish_logged(selector)
}

/// Run a full selection pass over members that were validated before.
pub fn select_versioned<I>(config: &SelectorConfig, members: I) -> Selection
where
    I: IntoIterator<Item = VersionedMember>,
{
    let span = info_span!(
        "snapshot_select",
        cutoff = %config.cutoff,
        version_path = %config.paths.version_path
    );
    let _guard = span.enter();

    let selector = members
        .into_iter()
        .fold(SnapshotSelector::new(config.clone()), |mut selector, member| {
            selector.offer_versioned(member);
            selector
        });
    finish_logged(selector)
}

fn finish_logged(selector: SnapshotSelector) -> Selection {
    let stats = selector.stats();
    info!(
        seen = stats.seen,
        selected = selector.len(),
        replaced = stats.replaced,
        too_recent = stats.too_recent,
        superseded = stats.superseded,
        rejected = stats.rejected,
        "Selection complete"
    );
    selector.finish()
}
