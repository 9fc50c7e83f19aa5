//! Snapshot options.
//!
//! Every field is optional. Options are resolved once per call into a
//! [`SnapshotHeader`]; "now" is passed in by the caller, never read here.
//!
//! ## Defaults
//!
//! | Option | Default |
//! |--------|---------|
//! | `cutoff` | the `now` given to [`SnapshotOptions::resolve`] |
//! | `snapshot_id` | `<streamId>Snapshot` |
//! | `version_path`, `timestamp_path` | declared on the source stream |
//! | `materialized` | `false` |

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::error::StructuralError;
use crate::metadata::SnapshotHeader;
use crate::types::{Iri, Term, VersionPaths};

/// Suffix appended to the stream id to form the default snapshot id.
pub const DEFAULT_SNAPSHOT_SUFFIX: &str = "Snapshot";

/// Options of a snapshot computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    /// Latest timestamp to include.
    pub cutoff: Option<DateTime<Utc>>,
    /// Id of the output collection or stream.
    pub snapshot_id: Option<Term>,
    /// Override for the declared version path.
    pub version_path: Option<Iri>,
    /// Override for the declared timestamp path.
    pub timestamp_path: Option<Iri>,
    /// Materialize selected versions.
    pub materialized: bool,
}

/// Option parameters for deterministic hashing.
#[derive(Serialize)]
struct OptionParams<'a> {
    cutoff: Option<String>,
    snapshot_id: Option<String>,
    version_path: Option<&'a str>,
    timestamp_path: Option<&'a str>,
    materialized: bool,
}

impl SnapshotOptions {
    /// Options with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; absent fields take their default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the cutoff.
    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Set the snapshot id.
    pub fn with_snapshot_id(mut self, id: Term) -> Self {
        self.snapshot_id = Some(id);
        self
    }

    /// Override the version path.
    pub fn with_version_path(mut self, path: Iri) -> Self {
        self.version_path = Some(path);
        self
    }

    /// Override the timestamp path.
    pub fn with_timestamp_path(mut self, path: Iri) -> Self {
        self.timestamp_path = Some(path);
        self
    }

    /// Set whether to materialize.
    pub fn materialized(mut self, materialized: bool) -> Self {
        self.materialized = materialized;
        self
    }

    /// Hash of the option parameters (xxh64, hex).
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&OptionParams {
            cutoff: self.cutoff.map(|c| c.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            snapshot_id: self.snapshot_id.as_ref().map(Term::to_string),
            version_path: self.version_path.as_ref().map(Iri::as_str),
            timestamp_path: self.timestamp_path.as_ref().map(Iri::as_str),
            materialized: self.materialized,
        })
    }

    /// Resolve into the header of a snapshot of `stream_id`.
    ///
    /// `declared` is only called when a path is not overridden; both
    /// declared paths must then be readable.
    pub fn resolve<F>(
        &self,
        stream_id: &Term,
        declared: F,
        now: DateTime<Utc>,
    ) -> Result<SnapshotHeader, StructuralError>
    where
        F: FnOnce() -> Result<VersionPaths, StructuralError>,
    {
        let paths = match (&self.version_path, &self.timestamp_path) {
            (Some(version_path), Some(timestamp_path)) => {
                VersionPaths::new(version_path.clone(), timestamp_path.clone())
            }
            (version_path, timestamp_path) => {
                let declared = declared()?;
                VersionPaths::new(
                    version_path.clone().unwrap_or(declared.version_path),
                    timestamp_path.clone().unwrap_or(declared.timestamp_path),
                )
            }
        };

        Ok(SnapshotHeader {
            id: self
                .snapshot_id
                .clone()
                .unwrap_or_else(|| default_snapshot_id(stream_id)),
            source_stream_id: stream_id.clone(),
            cutoff: self.cutoff.unwrap_or(now),
            paths,
            materialized: self.materialized,
        })
    }
}

/// Default id of a snapshot of `stream_id`.
pub fn default_snapshot_id(stream_id: &Term) -> Term {
    stream_id.with_suffix(DEFAULT_SNAPSHOT_SUFFIX)
}
