//! Members (version-records) of an event stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statement::Statement;
use super::term::{Iri, Term};
use crate::canonical_content::compute_content_hash;
use crate::error::MemberError;

/// The two predicates that navigate from a version-record to its
/// stable object id and its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionPaths {
    /// Predicate linking a version to its object id.
    pub version_path: Iri,
    /// Predicate giving the version's timestamp.
    pub timestamp_path: Iri,
}

impl VersionPaths {
    /// Create a new pair of paths.
    pub fn new(version_path: Iri, timestamp_path: Iri) -> Self {
        Self {
            version_path,
            timestamp_path,
        }
    }
}

impl std::fmt::Display for VersionPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.version_path, self.timestamp_path)
    }
}

/// A version-record: an id plus the closed set of statements describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Version identifier (IRI or blank node).
    pub id: Term,
    /// Statements describing this version.
    pub statements: Vec<Statement>,
}

impl Member {
    /// Create a new member.
    pub fn new(id: Term, statements: Vec<Statement>) -> Self {
        Self { id, statements }
    }

    /// Objects of the statements about this member's id with `predicate`.
    pub fn objects(&self, predicate: &Iri) -> Vec<&Term> {
        self.statements
            .iter()
            .filter(|s| s.is_about(&self.id, predicate))
            .map(|s| &s.object)
            .collect()
    }

    /// SHA-256 hash of the member's canonical content.
    pub fn content_hash(&self) -> String {
        compute_content_hash(&self.statements)
    }

    /// Read exactly one value following `path`, or fail.
    fn single_object(&self, path: &Iri) -> Result<&Term, MemberError> {
        match self.objects(path).as_slice() {
            [only] => Ok(*only),
            other => Err(MemberError::Cardinality {
                member: self.id.to_string(),
                path: path.clone(),
                found: other.len(),
            }),
        }
    }

    /// The stable object id of this version.
    ///
    /// Requires exactly one `version_path` statement on the member id.
    pub fn object_id(&self, version_path: &Iri) -> Result<Term, MemberError> {
        let object = self.single_object(version_path)?;
        if object.is_literal() {
            return Err(MemberError::InvalidObjectId {
                member: self.id.to_string(),
                value: object.to_string(),
            });
        }
        Ok(object.clone())
    }

    /// The timestamp of this version.
    ///
    /// Requires exactly one `timestamp_path` statement holding an `xsd:dateTime`.
    pub fn timestamp(&self, timestamp_path: &Iri) -> Result<DateTime<Utc>, MemberError> {
        let value = self.single_object(timestamp_path)?;
        value.as_date_time().ok_or_else(|| MemberError::InvalidTimestamp {
            member: self.id.to_string(),
            value: value.to_string(),
        })
    }
}

/// A member whose object id and timestamp have been validated.
///
/// The only way to obtain one is [`VersionedMember::from_member`] (or
/// [`VersionedMember::from_parts`] for already validated data), so holding
/// a `VersionedMember` proves both paths resolved to exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedMember {
    member: Member,
    object_id: Term,
    timestamp: DateTime<Utc>,
}

impl VersionedMember {
    /// Validate a member against the stream's paths.
    ///
    /// The object id is read before the timestamp, so a member lacking both
    /// reports the missing version path.
    pub fn from_member(member: Member, paths: &VersionPaths) -> Result<Self, MemberError> {
        let object_id = member.object_id(&paths.version_path)?;
        let timestamp = member.timestamp(&paths.timestamp_path)?;
        Ok(Self {
            member,
            object_id,
            timestamp,
        })
    }

    /// Build from parts that were validated elsewhere.
    ///
    /// Used for rewritten (materialized) members whose statements no
    /// longer carry the version path.
    pub fn from_parts(member: Member, object_id: Term, timestamp: DateTime<Utc>) -> Self {
        Self {
            member,
            object_id,
            timestamp,
        }
    }

    /// Version id.
    pub fn id(&self) -> &Term {
        &self.member.id
    }

    /// Stable object id.
    pub fn object_id(&self) -> &Term {
        &self.object_id
    }

    /// Version timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Statements of this version.
    pub fn statements(&self) -> &[Statement] {
        &self.member.statements
    }

    /// The underlying member.
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Unwrap into the underlying member.
    pub fn into_member(self) -> Member {
        self.member
    }

    /// Replace the statements, keeping id, object id and timestamp.
    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.member.statements = statements;
        self
    }
}
