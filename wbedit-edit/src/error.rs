//! Error types for the edit layer.

use crate::EditErrorFlags;
use thiserror::Error;
use wbedit_changeop::{ChangeOpError, MergeError};
use wbedit_diff::PatchError;
use wbedit_model::{EntityId, RevisionId};

/// Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Errors reported by an [`EntityStore`](crate::EntityStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored latest revision is not the expected base.
    #[error("edit conflict on {entity}: expected base {expected:?}, latest is {actual:?}")]
    Conflict {
        entity: EntityId,
        expected: Option<RevisionId>,
        actual: Option<RevisionId>,
    },

    #[error("{0} already exists")]
    AlreadyExists(EntityId),

    #[error("{0} does not exist")]
    NotFound(EntityId),

    #[error("{0} is a redirect")]
    IsRedirect(EntityId),

    #[error("entity has no id")]
    MissingId,

    /// Infrastructure failure.
    #[error("storage failure: {0}")]
    Failure(String),
}

/// Errors reported by an [`EntityRevisionLookup`](crate::EntityRevisionLookup).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{entity} has no revision {revision}")]
    BadRevision {
        entity: EntityId,
        revision: RevisionId,
    },

    #[error("{redirect} redirects to {target}")]
    UnresolvedRedirect { redirect: EntityId, target: EntityId },

    #[error("{0} does not exist")]
    NotFound(EntityId),

    #[error("lookup failure: {0}")]
    Failure(String),
}

/// Errors from the three-way conflict resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// The edit conflicts with a concurrent revision.
    #[error("unresolvable edit conflict ({conflicts} lost operations)")]
    Unresolvable { conflicts: usize, self_conflict: bool },

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Errors from an edit or merge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("bad edit token")]
    BadToken,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("rate limited")]
    RateLimited,

    #[error("edit conflict on {entity}: {source}")]
    ConflictUnresolvable {
        entity: EntityId,
        source: ConflictError,
    },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("rejected by edit filter: {0}")]
    Filtered(String),

    /// The store's compare-and-swap lost a race. The caller may retry.
    #[error("storage conflict: {0}")]
    StorageConflict(StoreError),

    #[error("storage failure: {0}")]
    StorageFailure(StoreError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    ChangeOp(#[from] ChangeOpError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl EditError {
    /// The checkpoint bit this error sets.
    #[must_use]
    pub fn flag(&self) -> EditErrorFlags {
        match self {
            Self::BadToken => EditErrorFlags::TOKEN,
            Self::PermissionDenied(_) => EditErrorFlags::PERMISSION,
            Self::RateLimited => EditErrorFlags::RATE_LIMIT,
            Self::ConflictUnresolvable { .. } => EditErrorFlags::EDIT_CONFLICT,
            Self::Filtered(_) => EditErrorFlags::FILTERED,
            Self::StorageConflict(_) | Self::StorageFailure(_) => EditErrorFlags::SAVE,
            Self::Precondition(_) | Self::Lookup(_) | Self::ChangeOp(_) | Self::Merge(_) => {
                EditErrorFlags::PRECONDITION
            }
        }
    }
}

impl From<StoreError> for EditError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } | StoreError::AlreadyExists(_) => {
                Self::StorageConflict(err)
            }
            other => Self::StorageFailure(other),
        }
    }
}
