//! Statement type for the graph model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::term::{Iri, Term};

/// A subject/predicate/object statement, optionally scoped to a graph.
///
/// The subject may be absent on statements produced by rewriting; such a
/// statement is addressed through its graph instead (see
/// [`Statement::effective_subject`]).
///
/// Implements `Ord` for deterministic ordering: (subject, predicate, object, graph).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// Subject node, absent for graph-scoped statements.
    pub subject: Option<Term>,
    /// Predicate.
    pub predicate: Iri,
    /// Object.
    pub object: Term,
    /// Graph scope.
    pub graph: Option<Term>,
}

impl Statement {
    /// Create a statement in the default graph.
    pub fn new(subject: Term, predicate: Iri, object: Term) -> Self {
        Self {
            subject: Some(subject),
            predicate,
            object,
            graph: None,
        }
    }

    /// Create a statement without a subject, scoped to `graph`.
    pub fn scoped(graph: Term, predicate: Iri, object: Term) -> Self {
        Self {
            subject: None,
            predicate,
            object,
            graph: Some(graph),
        }
    }

    /// Place this statement in a graph.
    pub fn in_graph(mut self, graph: Term) -> Self {
        self.graph = Some(graph);
        self
    }

    /// The node this statement is about.
    ///
    /// Falls back to the graph scope when the subject is absent, so that
    /// such statements are still found when looking up their node.
    pub fn effective_subject(&self) -> Option<&Term> {
        self.subject.as_ref().or(self.graph.as_ref())
    }

    /// Whether this statement is about `node` with the given predicate.
    pub fn is_about(&self, node: &Term, predicate: &Iri) -> bool {
        self.predicate == *predicate && self.effective_subject() == Some(node)
    }

    /// Canonical single-line form, used for content hashing.
    ///
    /// Statements without any subject render `_:` in subject position.
    pub fn canonical_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{} ", subject)?,
            None => write!(f, "_: ")?,
        }
        write!(f, "<{}> {}", self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {}", graph)?;
        }
        write!(f, " .")
    }
}
