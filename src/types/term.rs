//! Term types for the statement model.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab;

/// An IRI, used for predicates, paths and named nodes.
///
/// Wraps the IRI string and implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    /// Create a new IRI.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the IRI as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a new IRI by appending `suffix` to this one.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A literal value with its datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form.
    pub lexical: String,
    /// Datatype IRI.
    pub datatype: Iri,
    /// Language tag, only for language-tagged strings.
    pub language: Option<String>,
}

/// A node or value in a statement.
///
/// Ordering is IRIs, then blank nodes, then literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// Named node.
    Iri(Iri),
    /// Blank node, identified by its label (without the `_:` prefix).
    BlankNode(String),
    /// Literal value.
    Literal(Literal),
}

impl Term {
    /// Create a named node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(Iri::new(iri))
    }

    /// Create a blank node from its label.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::BlankNode(label.into())
    }

    /// Create an `xsd:string` literal.
    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::typed_literal(value, Iri::new(vocab::XSD_STRING))
    }

    /// Create a literal with an explicit datatype.
    pub fn typed_literal(value: impl Into<String>, datatype: Iri) -> Self {
        Self::Literal(Literal {
            lexical: value.into(),
            datatype,
            language: None,
        })
    }

    /// Create a language-tagged string literal.
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: value.into(),
            datatype: Iri::new(vocab::RDF_LANG_STRING),
            language: Some(language.into()),
        })
    }

    /// Create an `xsd:dateTime` literal.
    ///
    /// The lexical form is RFC 3339 in UTC, with as many fractional digits
    /// as needed to keep full precision, e.g. `2021-12-15T10:00:00Z` or
    /// `2021-12-15T10:00:00.123456789Z`.
    pub fn date_time(value: DateTime<Utc>) -> Self {
        Self::typed_literal(
            value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Iri::new(vocab::XSD_DATE_TIME),
        )
    }

    /// Read this term as an `xsd:dateTime` value.
    ///
    /// The timezone is optional in `xsd:dateTime`; values without one are
    /// read as UTC. Returns `None` for non-literals, other datatypes and
    /// unparsable lexical forms.
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Literal(lit) if lit.datatype.as_str() == vocab::XSD_DATE_TIME => {
                let lexical = lit.lexical.trim();
                DateTime::parse_from_rfc3339(lexical)
                    .map(|dt| dt.with_timezone(&Utc))
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
                    })
                    .ok()
            }
            _ => None,
        }
    }

    /// Get the IRI if this is a named node.
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Whether this term can be the subject of statements (IRI or blank node).
    pub fn is_node(&self) -> bool {
        !self.is_literal()
    }

    /// Whether this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Whether this term is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// The raw value: IRI string, blank node label or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri.as_str(),
            Self::BlankNode(label) => label,
            Self::Literal(lit) => &lit.lexical,
        }
    }

    /// Derive a new node by appending `suffix` to this term's value.
    ///
    /// IRIs stay IRIs and blank nodes stay blank nodes. A literal has no
    /// node identity, so its lexical form is promoted to an IRI.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        match self {
            Self::Iri(iri) => Self::Iri(iri.with_suffix(suffix)),
            Self::BlankNode(label) => Self::BlankNode(format!("{}{}", label, suffix)),
            Self::Literal(lit) => Self::iri(format!("{}{}", lit.lexical, suffix)),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

/// N-Triples style rendering, used for logs and content hashing.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::BlankNode(label) => write!(f, "_:{}", label),
            Self::Literal(lit) => {
                write!(f, "\"{}\"", escape_lexical(&lit.lexical))?;
                match &lit.language {
                    Some(lang) => write!(f, "@{}", lang),
                    None => write!(f, "^^<{}>", lit.datatype),
                }
            }
        }
    }
}

fn escape_lexical(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
