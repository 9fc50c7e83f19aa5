//! Snapshot metadata: headers, assembled snapshots and their parser.
//!
//! Reading a declaration is strict: every single-valued fact must occur
//! exactly once, otherwise a [`StructuralError`] is returned before any
//! member is looked at.

pub mod assembler;
pub mod parser;
pub mod snapshot;

use chrono::{DateTime, Utc};

use crate::error::{Fact, StructuralError};
use crate::store::GraphStore;
use crate::types::{Iri, Term, VersionPaths};
use crate::vocab;

pub use assembler::{SnapshotAssembler, SnapshotEvent, SnapshotStream};
pub use parser::{object_id_of_materialized, SnapshotMetadataParser};
pub use snapshot::{Snapshot, SnapshotHeader};

/// The single subject typed `ldes:EventStream`.
pub fn event_stream_id<S: GraphStore>(store: &S) -> Result<Term, StructuralError> {
    let streams = store.subjects(&Iri::new(vocab::RDF_TYPE), &Term::iri(vocab::LDES_EVENT_STREAM));
    match streams.as_slice() {
        [only] => Ok((*only).clone()),
        other => Err(StructuralError::Cardinality {
            fact: Fact::EventStream,
            subject: "graph".to_string(),
            found: other.len(),
        }),
    }
}

/// The version and timestamp paths declared on `stream`.
pub fn declared_paths<S: GraphStore>(store: &S, stream: &Term) -> Result<VersionPaths, StructuralError> {
    let version_path = single_iri(store, stream, vocab::LDES_VERSION_OF_PATH, Fact::VersionPath)?;
    let timestamp_path = single_iri(store, stream, vocab::LDES_TIMESTAMP_PATH, Fact::TimestampPath)?;
    Ok(VersionPaths::new(version_path, timestamp_path))
}

/// Read exactly one object of `subject` along `predicate`.
pub(crate) fn single_object<'s, S: GraphStore>(
    store: &'s S,
    subject: &Term,
    predicate: &str,
    fact: Fact,
) -> Result<&'s Term, StructuralError> {
    match store.objects(subject, &Iri::new(predicate)).as_slice() {
        [only] => Ok(*only),
        other => Err(StructuralError::Cardinality {
            fact,
            subject: subject.to_string(),
            found: other.len(),
        }),
    }
}

/// Read exactly one IRI-valued fact.
pub(crate) fn single_iri<S: GraphStore>(
    store: &S,
    subject: &Term,
    predicate: &str,
    fact: Fact,
) -> Result<Iri, StructuralError> {
    let value = single_object(store, subject, predicate, fact)?;
    value.as_iri().cloned().ok_or_else(|| StructuralError::InvalidFact {
        fact,
        subject: subject.to_string(),
        reason: format!("{} is not an IRI", value),
    })
}

/// Read exactly one node-valued fact (IRI or blank node).
pub(crate) fn single_node<S: GraphStore>(
    store: &S,
    subject: &Term,
    predicate: &str,
    fact: Fact,
) -> Result<Term, StructuralError> {
    let value = single_object(store, subject, predicate, fact)?;
    if value.is_literal() {
        return Err(StructuralError::InvalidFact {
            fact,
            subject: subject.to_string(),
            reason: format!("{} is a literal", value),
        });
    }
    Ok(value.clone())
}

/// Read exactly one `xsd:dateTime` fact.
pub(crate) fn single_date_time<S: GraphStore>(
    store: &S,
    subject: &Term,
    predicate: &str,
    fact: Fact,
) -> Result<DateTime<Utc>, StructuralError> {
    let value = single_object(store, subject, predicate, fact)?;
    value.as_date_time().ok_or_else(|| StructuralError::InvalidFact {
        fact,
        subject: subject.to_string(),
        reason: format!("{} is not an xsd:dateTime", value),
    })
}
