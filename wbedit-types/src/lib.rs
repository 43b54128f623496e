//! Core identifier types for wbedit.
//!
//! This crate defines the identifiers every other wbedit crate depends on:
//! - Entity and property identifiers (`Q42`, `P31`)
//! - Statement GUIDs, scoped to their owning entity (`Q42$<uuid>`)
//! - Revision identifiers handed out by the storage collaborator
//! - The [`GuidGenerator`] seam used to mint fresh statement GUIDs

mod guid;
mod ids;

pub use guid::{GuidGenerator, StatementGuid, UuidGuidGenerator};
pub use ids::{EntityId, EntityType, PropertyId, RevisionId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("invalid property id: {0}")]
    InvalidPropertyId(String),

    #[error("invalid statement guid: {0}")]
    InvalidGuid(String),
}
