//! Scenario tests for snapshot computation.
//!
//! These tests run the full pipeline over small event streams held in an
//! in-memory graph store.

use chrono::{DateTime, TimeZone, Utc};
use version_snapshot::{
    combine_snapshot_graphs, combine_snapshots, vocab, ConsistencyError, GraphStore, InMemoryGraphStore, Iri,
    MemberExtractor, SnapshotError, SnapshotEvent, SnapshotMetadataParser, SnapshotOptions, Snapshotter,
    Statement, StructuralError, Term,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn ex(s: &str) -> Term {
    Term::iri(format!("http://example.org/{}", s))
}

fn p(iri: &str) -> Iri {
    Iri::new(iri)
}

fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 12, 15, hour, min, sec).unwrap()
}

fn make_stream_header(store: &mut InMemoryGraphStore, es: &Term) {
    store.add(Statement::new(es.clone(), p(vocab::RDF_TYPE), Term::iri(vocab::LDES_EVENT_STREAM)));
    store.add(Statement::new(es.clone(), p(vocab::LDES_VERSION_OF_PATH), Term::iri(vocab::DCT_IS_VERSION_OF)));
    store.add(Statement::new(es.clone(), p(vocab::LDES_TIMESTAMP_PATH), Term::iri(vocab::DCT_ISSUED)));
}

fn add_version(store: &mut InMemoryGraphStore, es: &Term, version: &Term, object: &Term, ts: DateTime<Utc>, title: &str) {
    store.add(Statement::new(es.clone(), p(vocab::TREE_MEMBER), version.clone()));
    store.add(Statement::new(version.clone(), p(vocab::DCT_IS_VERSION_OF), object.clone()));
    store.add(Statement::new(version.clone(), p(vocab::DCT_ISSUED), Term::date_time(ts)));
    store.add(Statement::new(version.clone(), p(vocab::DCT_TITLE), Term::string_literal(title)));
}

/// Entity R with v0 at 10:00 ("First") and v1 at 12:00 ("Updated").
fn build_r_stream() -> InMemoryGraphStore {
    let es = ex("ES");
    let mut store = InMemoryGraphStore::new();
    make_stream_header(&mut store, &es);
    add_version(&mut store, &es, &ex("Rv0"), &ex("R"), at(10, 0, 0), "First");
    add_version(&mut store, &es, &ex("Rv1"), &ex("R"), at(12, 0, 0), "Updated");
    store
}

fn snapshot_at(store: &InMemoryGraphStore, cutoff: DateTime<Utc>) -> version_snapshot::Snapshot {
    Snapshotter::new(store)
        .unwrap()
        .snapshot_at(&SnapshotOptions::new().with_cutoff(cutoff), at(23, 0, 0))
        .unwrap()
}

fn title_of(snapshot: &version_snapshot::Snapshot, object: &Term) -> Option<String> {
    let member = snapshot.get(object)?;
    member
        .statements()
        .iter()
        .find(|s| s.predicate.as_str() == vocab::DCT_TITLE)
        .map(|s| s.object.value().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Cutoff Scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cutoff_before_first_version_is_empty() {
    let store = build_r_stream();
    let snapshot = snapshot_at(&store, at(9, 0, 0));

    assert!(snapshot.is_empty());
}

#[test]
fn test_cutoff_at_first_version() {
    let store = build_r_stream();
    let snapshot = snapshot_at(&store, at(10, 0, 0));

    assert_eq!(title_of(&snapshot, &ex("R")), Some("First".to_string()));
    assert_eq!(snapshot.get(&ex("R")).map(|m| m.id().clone()), Some(ex("Rv0")));
}

#[test]
fn test_cutoff_between_versions() {
    let store = build_r_stream();
    let snapshot = snapshot_at(&store, at(10, 0, 1));

    assert_eq!(title_of(&snapshot, &ex("R")), Some("First".to_string()));
}

#[test]
fn test_cutoff_at_and_after_second_version() {
    let store = build_r_stream();

    for cutoff in [at(12, 0, 0), at(18, 30, 0)] {
        let snapshot = snapshot_at(&store, cutoff);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(title_of(&snapshot, &ex("R")), Some("Updated".to_string()));
        assert_eq!(snapshot.get(&ex("R")).map(|m| m.id().clone()), Some(ex("Rv1")));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cyclic_members_extracted_once() {
    // A -> B -> A through nested nodes of each version
    let es = ex("ES");
    let mut store = InMemoryGraphStore::new();
    make_stream_header(&mut store, &es);
    add_version(&mut store, &es, &ex("Av0"), &ex("A"), at(10, 0, 0), "A");
    add_version(&mut store, &es, &ex("Bv0"), &ex("B"), at(10, 0, 0), "B");
    store.add(Statement::new(ex("Av0"), p("http://example.org/knows"), ex("Bv0")));
    store.add(Statement::new(ex("Bv0"), p("http://example.org/knows"), ex("Av0")));
    store.add(Statement::new(ex("Av0"), p("http://example.org/part"), ex("loopA")));
    store.add(Statement::new(ex("loopA"), p("http://example.org/part"), ex("Av0")));

    let members = MemberExtractor::new(&store).extract(&es);

    assert_eq!(members.len(), 2);
    let a = &members[0];
    assert_eq!(a.id, ex("Av0"));
    // 3 version statements, knows B, part loopA, loopA part A
    assert_eq!(a.statements.len(), 6);
    let mut sorted = a.statements.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), a.statements.len());

    let snapshot = snapshot_at(&store, at(11, 0, 0));
    assert_eq!(snapshot.len(), 2);
}

#[test]
fn test_malformed_member_skipped() {
    let es = ex("ES");
    let mut store = build_r_stream();
    // Missing version path
    store.add(Statement::new(es.clone(), p(vocab::TREE_MEMBER), ex("Broken")));
    store.add(Statement::new(ex("Broken"), p(vocab::DCT_ISSUED), Term::date_time(at(9, 0, 0))));
    // Valid member after it
    add_version(&mut store, &es, &ex("Sv0"), &ex("S"), at(11, 0, 0), "Other");

    let snapshot = snapshot_at(&store, at(12, 0, 0));

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.members().iter().all(|m| m.id() != &ex("Broken")));
    assert_eq!(title_of(&snapshot, &ex("S")), Some("Other".to_string()));
}

#[test]
fn test_timestamp_without_timezone_read_as_utc() {
    let es = ex("ES");
    let mut store = InMemoryGraphStore::new();
    make_stream_header(&mut store, &es);
    let version = ex("Tv0");
    store.add(Statement::new(es.clone(), p(vocab::TREE_MEMBER), version.clone()));
    store.add(Statement::new(version.clone(), p(vocab::DCT_IS_VERSION_OF), ex("T")));
    store.add(Statement::new(
        version.clone(),
        p(vocab::DCT_ISSUED),
        Term::typed_literal("2021-12-15T10:00:00", p(vocab::XSD_DATE_TIME)),
    ));

    let before = snapshot_at(&store, at(9, 59, 59));
    let after = snapshot_at(&store, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());

    assert!(before.is_empty());
    assert_eq!(after.len(), 1);
    assert_eq!(after.get(&ex("T")).map(|m| m.timestamp()), Some(at(10, 0, 0)));

    // A stored snapshot holding such a member parses back
    let parsed = SnapshotMetadataParser::parse(&after.to_graph()).unwrap();
    assert_eq!(parsed, after);
}

#[test]
fn test_blank_node_members() {
    let es = ex("ES");
    let mut store = InMemoryGraphStore::new();
    make_stream_header(&mut store, &es);
    let v0 = Term::blank("v0");
    let v1 = Term::blank("v1");
    add_version(&mut store, &es, &v0, &ex("A"), at(10, 0, 0), "old");
    // Statements scoped to the version graph, without subject
    store.add(Statement::new(es.clone(), p(vocab::TREE_MEMBER), v1.clone()));
    store.add(Statement::scoped(v1.clone(), p(vocab::DCT_IS_VERSION_OF), ex("A")));
    store.add(Statement::scoped(v1.clone(), p(vocab::DCT_ISSUED), Term::date_time(at(11, 0, 0))));
    store.add(Statement::scoped(v1.clone(), p(vocab::DCT_TITLE), Term::string_literal("new")));

    let snapshot = snapshot_at(&store, at(12, 0, 0));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&ex("A")).map(|m| m.id().clone()), Some(v1));
    assert_eq!(title_of(&snapshot, &ex("A")), Some("new".to_string()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Output Shapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_event_stream_output_shape() {
    let store = build_r_stream();
    let graph = Snapshotter::new(&store)
        .unwrap()
        .snapshot_at(&SnapshotOptions::new().with_cutoff(at(12, 0, 0)), at(23, 0, 0))
        .unwrap()
        .to_graph();
    let id = ex("ESSnapshot");

    assert_eq!(graph.objects(&id, &p(vocab::RDF_TYPE)), vec![&Term::iri(vocab::LDES_EVENT_STREAM)]);
    assert_eq!(graph.objects(&id, &p(vocab::LDES_SNAPSHOT_OF)), vec![&ex("ES")]);
    assert_eq!(graph.objects(&id, &p(vocab::LDES_SNAPSHOT_UNTIL)), vec![&Term::date_time(at(12, 0, 0))]);
    assert_eq!(graph.objects(&id, &p(vocab::TREE_MEMBER)), vec![&ex("Rv1")]);
    // Version statements are unmodified
    assert_eq!(graph.objects(&ex("Rv1"), &p(vocab::DCT_IS_VERSION_OF)), vec![&ex("R")]);
    assert!(graph.statements_about(&ex("Rv0")).is_empty());
}

#[test]
fn test_materialized_output_shape() {
    let store = build_r_stream();
    let options = SnapshotOptions::new()
        .with_cutoff(at(12, 0, 0))
        .with_snapshot_id(ex("materialized"))
        .materialized(true);
    let graph = Snapshotter::new(&store)
        .unwrap()
        .snapshot_at(&options, at(23, 0, 0))
        .unwrap()
        .to_graph();
    let id = ex("materialized");

    assert_eq!(graph.objects(&id, &p(vocab::RDF_TYPE)), vec![&Term::iri(vocab::TREE_COLLECTION)]);
    assert_eq!(graph.objects(&id, &p(vocab::LDES_VERSION_MATERIALIZATION_OF)), vec![&ex("ES")]);
    assert_eq!(
        graph.objects(&id, &p(vocab::LDES_VERSION_MATERIALIZATION_UNTIL)),
        vec![&Term::date_time(at(12, 0, 0))]
    );
    assert_eq!(graph.objects(&id, &p(vocab::TREE_MEMBER)), vec![&ex("R")]);
    assert_eq!(graph.objects(&ex("R"), &p(vocab::DCT_HAS_VERSION)), vec![&ex("Rv1")]);
    assert_eq!(graph.objects(&ex("R"), &p(vocab::DCT_ISSUED)), vec![&Term::date_time(at(12, 0, 0))]);
    assert_eq!(graph.objects(&ex("R"), &p(vocab::DCT_TITLE)), vec![&Term::string_literal("Updated")]);
    assert!(graph.statements(None, Some(&p(vocab::DCT_IS_VERSION_OF)), None).is_empty());
    assert_eq!(version_snapshot::object_id_of_materialized(&graph, &ex("Rv1")), Ok(ex("R")));
}

#[test]
fn test_header_event_precedes_records() {
    let store = build_r_stream();
    let events: Vec<_> = Snapshotter::new(&store)
        .unwrap()
        .events_at(&SnapshotOptions::new().with_cutoff(at(9, 0, 0)), at(23, 0, 0))
        .unwrap()
        .collect();

    // Header even though nothing is selected
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], SnapshotEvent::Header(statements) if statements.len() == 5));
}

#[test]
fn test_explicit_paths_override_declaration() {
    let es = ex("ES");
    let mut store = InMemoryGraphStore::new();
    store.add(Statement::new(es.clone(), p(vocab::RDF_TYPE), Term::iri(vocab::LDES_EVENT_STREAM)));
    add_version(&mut store, &es, &ex("Rv0"), &ex("R"), at(10, 0, 0), "First");

    let snapshotter = Snapshotter::new(&store).unwrap();
    let err = snapshotter
        .snapshot_at(&SnapshotOptions::new(), at(23, 0, 0))
        .unwrap_err();
    assert!(matches!(err, StructuralError::Cardinality { found: 0, .. }));

    let options = SnapshotOptions::new()
        .with_version_path(p(vocab::DCT_IS_VERSION_OF))
        .with_timestamp_path(p(vocab::DCT_ISSUED));
    let snapshot = snapshotter.snapshot_at(&options, at(23, 0, 0)).unwrap();
    assert_eq!(snapshot.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing and Combining
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parse_assembled_snapshot() {
    let store = build_r_stream();
    let snapshot = snapshot_at(&store, at(12, 0, 0));
    let parsed = SnapshotMetadataParser::parse(&snapshot.to_graph()).unwrap();

    assert_eq!(parsed, snapshot);
}

#[test]
fn test_default_cutoff_survives_parse_exactly() {
    let store = build_r_stream();
    let now = at(12, 0, 0) + chrono::Duration::nanoseconds(123_456_789);
    let snapshot = Snapshotter::new(&store)
        .unwrap()
        .snapshot_at(&SnapshotOptions::new(), now)
        .unwrap();
    let parsed = SnapshotMetadataParser::parse(&snapshot.to_graph()).unwrap();

    assert_eq!(snapshot.cutoff(), now);
    assert_eq!(parsed.cutoff(), now);
    assert_eq!(parsed.fingerprint(), snapshot.fingerprint());
}

#[test]
fn test_combine_equals_direct_selection() {
    let es = ex("ES");
    let mut store = build_r_stream();
    add_version(&mut store, &es, &ex("Sv0"), &ex("S"), at(9, 0, 0), "S0");
    add_version(&mut store, &es, &ex("Sv1"), &ex("S"), at(11, 0, 0), "S1");
    add_version(&mut store, &es, &ex("Tv0"), &ex("T"), at(11, 30, 0), "T0");

    let early = snapshot_at(&store, at(10, 0, 0));
    let late = snapshot_at(&store, at(12, 0, 0));
    let direct = snapshot_at(&store, at(12, 0, 0));

    let combined = combine_snapshots(early.clone(), late.clone()).unwrap();
    assert_eq!(combined.fingerprint(), direct.fingerprint());

    let from_graphs = combine_snapshot_graphs(&late.to_graph(), &early.to_graph()).unwrap();
    assert_eq!(from_graphs.fingerprint(), direct.fingerprint());
}

#[test]
fn test_combine_rejects_different_streams() {
    let a = build_r_stream();
    let mut b = InMemoryGraphStore::new();
    make_stream_header(&mut b, &ex("Other"));
    add_version(&mut b, &ex("Other"), &ex("Rv0"), &ex("R"), at(10, 0, 0), "First");

    let left = snapshot_at(&a, at(12, 0, 0));
    let right = snapshot_at(&b, at(12, 0, 0));

    assert!(matches!(
        combine_snapshots(left, right),
        Err(ConsistencyError::SourceMismatch { .. })
    ));
}

#[test]
fn test_incremental_snapshot() {
    let store = build_r_stream();
    let snapshotter = Snapshotter::new(&store).unwrap();
    let base = snapshotter
        .snapshot_at(&SnapshotOptions::new().with_cutoff(at(10, 30, 0)), at(23, 0, 0))
        .unwrap();

    let incremental = snapshotter
        .create_incremental_at(
            &SnapshotOptions::new().with_cutoff(at(13, 0, 0)),
            &base.to_graph(),
            at(23, 0, 0),
        )
        .unwrap();

    assert_eq!(incremental.cutoff(), at(13, 0, 0));
    assert_eq!(title_of(&incremental, &ex("R")), Some("Updated".to_string()));
}

#[test]
fn test_incremental_from_materialized_base_fails() {
    let store = build_r_stream();
    let snapshotter = Snapshotter::new(&store).unwrap();
    let base = snapshotter
        .snapshot_at(&SnapshotOptions::new().with_cutoff(at(10, 30, 0)).materialized(true), at(23, 0, 0))
        .unwrap();

    let err = snapshotter
        .create_incremental_at(&SnapshotOptions::new(), &base.to_graph(), at(23, 0, 0))
        .unwrap_err();

    assert!(matches!(err, SnapshotError::Structural(_)));
}
