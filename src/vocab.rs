//! Vocabulary IRIs used by event streams and their snapshots.

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:langString`.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Linked data event stream namespace.
pub const LDES_NS: &str = "https://w3id.org/ldes#";

// Classes
/// `ldes:EventStream`.
pub const LDES_EVENT_STREAM: &str = "https://w3id.org/ldes#EventStream";
/// `tree:Collection`.
pub const TREE_COLLECTION: &str = "https://w3id.org/tree#Collection";

// Stream declaration
/// `ldes:versionOfPath`.
pub const LDES_VERSION_OF_PATH: &str = "https://w3id.org/ldes#versionOfPath";
/// `ldes:timestampPath`.
pub const LDES_TIMESTAMP_PATH: &str = "https://w3id.org/ldes#timestampPath";

// Snapshot headers
/// `ldes:versionMaterializationOf`.
pub const LDES_VERSION_MATERIALIZATION_OF: &str = "https://w3id.org/ldes#versionMaterializationOf";
/// `ldes:versionMaterializationUntil`.
pub const LDES_VERSION_MATERIALIZATION_UNTIL: &str =
    "https://w3id.org/ldes#versionMaterializationUntil";
/// `ldes:snapshotOf`.
pub const LDES_SNAPSHOT_OF: &str = "https://w3id.org/ldes#snapshotOf";
/// `ldes:snapshotUntil`.
pub const LDES_SNAPSHOT_UNTIL: &str = "https://w3id.org/ldes#snapshotUntil";

/// `tree:member`, the containment predicate.
pub const TREE_MEMBER: &str = "https://w3id.org/tree#member";

// Dublin Core terms
/// `dct:hasVersion`.
pub const DCT_HAS_VERSION: &str = "http://purl.org/dc/terms/hasVersion";
/// `dct:isVersionOf`, the default version path.
pub const DCT_IS_VERSION_OF: &str = "http://purl.org/dc/terms/isVersionOf";
/// `dct:created`, the default timestamp path.
pub const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
/// `dct:issued`.
pub const DCT_ISSUED: &str = "http://purl.org/dc/terms/issued";
/// `dct:title`.
pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";

// Datatypes
/// `xsd:dateTime`.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
/// `xsd:string`.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
