//! Version materialization.
//!
//! Rewrites the statements of a selected version so they describe the
//! stable object instead of the version:
//!
//! - the version-path statement becomes `<object> dct:hasVersion <version>`
//! - statements about the version id (including the timestamp) move to the
//!   object id
//! - the version id in object position is replaced by the object id
//! - a statement without subject is attributed to its graph, or to the
//!   object id when it has no graph either
//! - statements about nested nodes are copied unchanged
//!
//! Output statements live in the default graph.

use std::collections::HashSet;

use crate::types::{Iri, Statement, VersionPaths, VersionedMember};
use crate::vocab;

/// Rewrites selected versions into statements about their object.
#[derive(Debug, Clone)]
pub struct Materializer {
    paths: VersionPaths,
    has_version: Iri,
}

impl Materializer {
    /// Create a materializer for members read with `paths`.
    pub fn new(paths: VersionPaths) -> Self {
        Self {
            paths,
            has_version: Iri::new(vocab::DCT_HAS_VERSION),
        }
    }

    /// Materialized statements of `member`.
    ///
    /// The result holds no duplicates and preserves input order otherwise.
    pub fn materialize(&self, member: &VersionedMember) -> Vec<Statement> {
        let version = member.id();
        let object = member.object_id();

        let mut seen: HashSet<Statement> = HashSet::with_capacity(member.statements().len());
        let mut out: Vec<Statement> = Vec::with_capacity(member.statements().len());
        for statement in member.statements() {
            let rewritten = if statement.is_about(version, &self.paths.version_path) {
                Statement::new(object.clone(), self.has_version.clone(), version.clone())
            } else {
                let subject = match statement.effective_subject() {
                    Some(s) if s == version => object.clone(),
                    Some(s) => s.clone(),
                    None => object.clone(),
                };
                let value = if &statement.object == version {
                    object.clone()
                } else {
                    statement.object.clone()
                };
                Statement::new(subject, statement.predicate.clone(), value)
            };

            if seen.insert(rewritten.clone()) {
                out.push(rewritten);
            }
        }
        out
    }

    /// Materialize `member` in place of its statements.
    pub fn apply(&self, member: VersionedMember) -> VersionedMember {
        let statements = self.materialize(&member);
        member.with_statements(statements)
    }
}
