//! Core types for the snapshot kernel.

pub mod term;
pub mod statement;
pub mod member;

pub use term::{Iri, Literal, Term};
pub use statement::Statement;
pub use member::{Member, VersionPaths, VersionedMember};
