//! Document model for wbedit.
//!
//! Defines the value types every other wbedit subsystem operates on:
//! - [`Entity`]: an item or property with fingerprint, statements and site links
//! - [`Fingerprint`]: labels, descriptions and aliases per language
//! - [`Statement`]: main snak, qualifiers, references and rank, keyed by GUID
//! - [`Snak`] / [`Reference`]: property assertions, and groups of them
//!   identified by content hash
//! - [`Summary`]: structured, unrendered edit-summary fragments
//!
//! These types are plain values. They are mutated only through the
//! change-op and patch layers, which always work on an owned copy.

mod entity;
mod hash;
mod sitelink;
mod snak;
mod statement;
mod summary;
mod term;

pub use entity::{Entity, EntityRedirect, EntityRevision};
pub use sitelink::{SiteLink, SiteLinkList};
pub use snak::{DataValue, Snak, SnakList};
pub use statement::{Rank, Reference, ReferenceList, Statement, StatementList};
pub use summary::Summary;
pub use term::{AliasGroup, AliasGroupList, Fingerprint, Term, TermList};

pub use wbedit_types::{EntityId, EntityType, PropertyId, RevisionId, StatementGuid};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by model invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("entity id {id} does not match entity type {expected}")]
    IdTypeMismatch { id: EntityId, expected: EntityType },

    #[error("entity already has id {0}")]
    IdAlreadySet(EntityId),

    #[error("statement guid {0} already present")]
    DuplicateGuid(StatementGuid),
}
