//! Error types for change ops and merges.

use crate::merge::ConflictKind;
use thiserror::Error;
use wbedit_model::{EntityId, EntityType, ModelError, PropertyId, StatementGuid};
use wbedit_validation::ValidationResult;

/// Result type for change-op application.
pub type ChangeOpResult<T> = Result<T, ChangeOpError>;

/// Result type for cross-entity merges.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors raised while applying a change op.
///
/// Apart from [`ChangeOpError::Validation`], these depend on the snapshot
/// the op is applied to and can only be discovered during application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeOpError {
    #[error("validation failed: {0}")]
    Validation(ValidationResult),

    #[error("no statement with guid {0}")]
    NoSuchStatement(StatementGuid),

    #[error("statement {guid} uses property {expected}, not {actual}")]
    PropertyMismatch {
        guid: StatementGuid,
        expected: PropertyId,
        actual: PropertyId,
    },

    #[error("statement already has a reference with hash {0}")]
    DuplicateReference(String),

    #[error("no reference with hash {0}")]
    NoSuchReference(String),

    #[error("statement already has qualifier {0}")]
    DuplicateQualifier(String),

    #[error("no qualifier with hash {0}")]
    NoSuchQualifier(String),

    #[error("no change: {0}")]
    NoChange(String),

    #[error("entity has no id yet")]
    MissingEntityId,

    #[error("statement {guid} does not belong to {entity}")]
    ForeignGuid {
        guid: StatementGuid,
        entity: EntityId,
    },

    #[error("{0} entities do not have site links")]
    SiteLinksUnsupported(EntityType),

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised by [`ChangeOpsMerge`](crate::ChangeOpsMerge).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("merge conflict on {kind} {key}")]
    Conflict { kind: ConflictKind, key: String },

    #[error("unknown conflict kind {0:?}")]
    UnknownConflictKind(String),

    #[error("cannot merge {0} into itself")]
    SameEntity(EntityId),

    #[error("cannot merge a {from} into a {to}")]
    TypeMismatch { from: EntityType, to: EntityType },

    #[error("both entities of a merge need an id")]
    MissingId,

    #[error("{from} and {to} link to each other")]
    CrossLinked { from: EntityId, to: EntityId },

    #[error("change op failed during merge: {0}")]
    ChangeOp(#[from] ChangeOpError),
}
