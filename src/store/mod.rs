//! Graph storage backends.

pub mod memory;

use std::collections::BTreeSet;

use crate::types::{Iri, Statement, Term};

/// Trait for statement stores the snapshot kernel reads from.
///
/// Implementations must guarantee deterministic ordering of results.
/// All data is resident, so lookups are synchronous.
pub trait GraphStore {
    /// Statements matching a pattern; `None` matches anything.
    ///
    /// The subject pattern is compared against
    /// [`Statement::effective_subject`], so graph-scoped statements without
    /// a subject are found through their graph.
    fn statements(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Statement>;

    /// Number of statements in the store.
    fn len(&self) -> usize;

    /// Whether the store holds no statements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Objects of `subject` along `predicate`.
    fn objects(&self, subject: &Term, predicate: &Iri) -> Vec<&Term> {
        self.statements(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|s| &s.object)
            .collect()
    }

    /// Distinct subjects having `predicate` with `object` (ordered).
    fn subjects(&self, predicate: &Iri, object: &Term) -> Vec<&Term> {
        let subjects: BTreeSet<&Term> = self
            .statements(None, Some(predicate), Some(object))
            .into_iter()
            .filter_map(Statement::effective_subject)
            .collect();
        subjects.into_iter().collect()
    }

    /// All statements about `node`.
    fn statements_about(&self, node: &Term) -> Vec<&Statement> {
        self.statements(Some(node), None, None)
    }
}

pub use memory::InMemoryGraphStore;
