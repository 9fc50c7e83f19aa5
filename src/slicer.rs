//! Member extraction.
//!
//! Slices a flat graph into self-contained members, one per containment
//! target of a collection.

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::store::GraphStore;
use crate::types::{Iri, Member, Statement, Term};
use crate::vocab;

/// Extracts members from a graph.
///
/// ## Algorithm
///
/// For each top-level id (a containment target of the collection):
///
/// 1. Seed the member with all statements about the id
/// 2. Queue every object of an included statement that was not visited yet
/// 3. Pop a node; unless it is another top-level id, include the statements
///    about it and queue their objects
/// 4. Stop when the queue is empty
///
/// The visited set is seeded with the member's own id, so self references
/// and cycles terminate. Included statements are deduplicated.
pub struct MemberExtractor<'a, S: GraphStore> {
    store: &'a S,
    containment: Iri,
}

impl<'a, S: GraphStore> MemberExtractor<'a, S> {
    /// Create an extractor following `tree:member` containment statements.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            containment: Iri::new(vocab::TREE_MEMBER),
        }
    }

    /// Use a different containment predicate.
    pub fn with_containment(mut self, predicate: Iri) -> Self {
        self.containment = predicate;
        self
    }

    /// Top-level member ids of `collection`, in store order.
    ///
    /// Literal containment targets cannot carry statements and are skipped.
    pub fn member_ids(&self, collection: &Term) -> Vec<Term> {
        self.store
            .objects(collection, &self.containment)
            .into_iter()
            .filter(|id| {
                if id.is_literal() {
                    warn!(collection = %collection, target = %id, "Skipping literal containment target");
                    return false;
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Lazily extract the members of `collection`.
    ///
    /// Each member is sliced when the iterator reaches it.
    pub fn members(&self, collection: &Term) -> Members<'a, S> {
        let ids = self.member_ids(collection);
        let top_level = ids.iter().cloned().collect();
        Members {
            extractor: MemberExtractor {
                store: self.store,
                containment: self.containment.clone(),
            },
            ids: ids.into_iter(),
            top_level,
        }
    }

    /// Extract all members of `collection`.
    pub fn extract(&self, collection: &Term) -> Vec<Member> {
        self.members(collection).collect()
    }

    /// Extract a single member rooted at `id`.
    ///
    /// Expansion never enters a node of `top_level` other than `id` itself.
    pub fn extract_member(&self, id: &Term, top_level: &BTreeSet<Term>) -> Member {
        let mut visited: HashSet<&Term> = HashSet::new();
        let mut included: HashSet<&Statement> = HashSet::new();
        let mut statements: Vec<Statement> = Vec::new();
        let mut frontier: VecDeque<&Term> = VecDeque::new();

        visited.insert(id);
        frontier.push_back(id);

        while let Some(node) = frontier.pop_front() {
            if node != id && top_level.contains(node) {
                continue;
            }

            for statement in self.store.statements_about(node) {
                if !included.insert(statement) {
                    continue;
                }
                statements.push(statement.clone());

                let object = &statement.object;
                if object.is_node() && visited.insert(object) {
                    frontier.push_back(object);
                }
            }
        }

        debug!(member = %id, statements = statements.len(), "Extracted member");
        Member::new(id.clone(), statements)
    }
}

/// Iterator over the members of a collection.
pub struct Members<'a, S: GraphStore> {
    extractor: MemberExtractor<'a, S>,
    ids: std::vec::IntoIter<Term>,
    top_level: BTreeSet<Term>,
}

impl<S: GraphStore> Iterator for Members<'_, S> {
    type Item = Member;

    fn next(&mut self) -> Option<Member> {
        let id = self.ids.next()?;
        Some(self.extractor.extract_member(&id, &self.top_level))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGraphStore;

    fn iri(s: &str) -> Term {
        Term::iri(format!("http://example.org/{}", s))
    }

    fn p(s: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", s))
    }

    fn contains(collection: &Term, member: &Term) -> Statement {
        Statement::new(collection.clone(), Iri::new(vocab::TREE_MEMBER), member.clone())
    }

    #[test]
    fn test_extract_flat_members() {
        let es = iri("es");
        let (a, b) = (iri("a"), iri("b"));
        let store: InMemoryGraphStore = vec![
            contains(&es, &a),
            contains(&es, &b),
            Statement::new(a.clone(), p("title"), Term::string_literal("A")),
            Statement::new(b.clone(), p("title"), Term::string_literal("B")),
        ]
        .into_iter()
        .collect();

        let members = MemberExtractor::new(&store).extract(&es);

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, a);
        assert_eq!(members[0].statements.len(), 1);
        assert_eq!(members[1].id, b);
    }

    #[test]
    fn test_extract_follows_nested_nodes() {
        let es = iri("es");
        let a = iri("a");
        let nested = Term::blank("n0");
        let deeper = Term::blank("n1");
        let store: InMemoryGraphStore = vec![
            contains(&es, &a),
            Statement::new(a.clone(), p("part"), nested.clone()),
            Statement::new(nested.clone(), p("part"), deeper.clone()),
            Statement::new(deeper, p("label"), Term::string_literal("deep")),
        ]
        .into_iter()
        .collect();

        let members = MemberExtractor::new(&store).extract(&es);

        assert_eq!(members[0].statements.len(), 3);
    }

    #[test]
    fn test_extract_terminates_on_cycle() {
        // a -> x -> y -> x, and y -> a
        let es = iri("es");
        let (a, x, y) = (iri("a"), iri("x"), iri("y"));
        let store: InMemoryGraphStore = vec![
            contains(&es, &a),
            Statement::new(a.clone(), p("next"), x.clone()),
            Statement::new(x.clone(), p("next"), y.clone()),
            Statement::new(y.clone(), p("next"), x.clone()),
            Statement::new(y.clone(), p("back"), a.clone()),
        ]
        .into_iter()
        .collect();

        let members = MemberExtractor::new(&store).extract(&es);

        assert_eq!(members[0].statements.len(), 4);
        let unique: HashSet<_> = members[0].statements.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_extract_does_not_enter_other_members() {
        let es = iri("es");
        let (a, b) = (iri("a"), iri("b"));
        let store: InMemoryGraphStore = vec![
            contains(&es, &a),
            contains(&es, &b),
            Statement::new(a.clone(), p("related"), b.clone()),
            Statement::new(b.clone(), p("related"), a.clone()),
            Statement::new(b.clone(), p("title"), Term::string_literal("B")),
        ]
        .into_iter()
        .collect();

        let members = MemberExtractor::new(&store).extract(&es);

        // The link is kept, b's own statements are not pulled into a
        assert_eq!(members[0].statements, vec![Statement::new(a.clone(), p("related"), b.clone())]);
        assert_eq!(members[1].statements.len(), 2);
    }

    #[test]
    fn test_extract_keeps_graph_scoped_statements() {
        let es = iri("es");
        let v = Term::blank("v0");
        let store: InMemoryGraphStore = vec![
            contains(&es, &v),
            Statement::scoped(v.clone(), p("title"), Term::string_literal("scoped")),
        ]
        .into_iter()
        .collect();

        let members = MemberExtractor::new(&store).extract(&es);

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].statements.len(), 1);
        assert_eq!(members[0].statements[0].subject, None);
    }

    #[test]
    fn test_literal_containment_targets_skipped() {
        let es = iri("es");
        let store: InMemoryGraphStore = vec![
            Statement::new(es.clone(), Iri::new(vocab::TREE_MEMBER), Term::string_literal("nope")),
        ]
        .into_iter()
        .collect();

        assert!(MemberExtractor::new(&store).member_ids(&es).is_empty());
    }

    #[test]
    fn test_members_is_lazy() {
        let es = iri("es");
        let store: InMemoryGraphStore = (0..5)
            .map(|i| contains(&es, &iri(&format!("m{}", i))))
            .collect();

        let extractor = MemberExtractor::new(&store);
        let mut members = extractor.members(&es);

        assert_eq!(members.size_hint(), (5, Some(5)));
        assert!(members.next().is_some());
        assert_eq!(members.size_hint(), (4, Some(4)));
    }
}
