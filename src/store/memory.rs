//! In-memory statement store.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Iri, Statement, Term};
use super::GraphStore;

/// In-memory statement store.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order. Adding a
/// statement twice has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryGraphStore {
    /// All statements.
    statements: BTreeSet<Statement>,
    /// Effective subject -> statements about it.
    by_subject: BTreeMap<Term, BTreeSet<Statement>>,
    /// Statements with neither subject nor graph.
    detached: usize,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement. Returns `false` if it was already present.
    pub fn add(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            return false;
        }
        match statement.effective_subject() {
            Some(subject) => {
                self.by_subject
                    .entry(subject.clone())
                    .or_default()
                    .insert(statement.clone());
            }
            None => self.detached += 1,
        }
        self.statements.insert(statement)
    }

    /// Add several statements.
    pub fn add_all<I: IntoIterator<Item = Statement>>(&mut self, statements: I) {
        for statement in statements {
            self.add(statement);
        }
    }

    /// Remove a statement. Returns `false` if it was not present.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        if !self.statements.remove(statement) {
            return false;
        }
        match statement.effective_subject() {
            Some(subject) => {
                if let Some(set) = self.by_subject.get_mut(subject) {
                    set.remove(statement);
                    if set.is_empty() {
                        self.by_subject.remove(subject);
                    }
                }
            }
            None => self.detached -= 1,
        }
        true
    }

    /// Whether the statement is present.
    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains(statement)
    }

    /// Iterate over all statements in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Number of statements that cannot be looked up by subject.
    pub fn num_detached(&self) -> usize {
        self.detached
    }
}

impl GraphStore for InMemoryGraphStore {
    fn statements(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Statement> {
        let matches = |s: &&Statement| {
            predicate.map_or(true, |p| s.predicate == *p) && object.map_or(true, |o| s.object == *o)
        };

        match subject {
            Some(subject) => self
                .by_subject
                .get(subject)
                .map(|set| set.iter().filter(matches).collect())
                .unwrap_or_default(),
            None => self.statements.iter().filter(matches).collect(),
        }
    }

    fn len(&self) -> usize {
        self.statements.len()
    }
}

impl FromIterator<Statement> for InMemoryGraphStore {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        let mut store = Self::new();
        store.add_all(iter);
        store
    }
}

impl Extend<Statement> for InMemoryGraphStore {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl IntoIterator for InMemoryGraphStore {
    type Item = Statement;
    type IntoIter = std::collections::btree_set::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
