//! Structural diff and patch of entities.
//!
//! [`EntityDiffer`] computes an [`EntityDiff`] between two snapshots of the
//! same entity, field by field:
//!
//! - labels, descriptions and site links diff as maps keyed by language or
//!   site id ([`MapDiff`]);
//! - aliases diff per language as an ordered-list diff ([`ListDiff`]), and
//!   so do the qualifiers and references of a statement;
//! - statements diff by GUID: a statement present on both sides becomes a
//!   [`StatementDiff`] of its own fields, not a remove plus an add.
//!
//! Order is part of the diff. Inserted list values and added statements
//! carry their index in the new snapshot, and a move that insertions and
//! removals cannot express is recorded as the full new order, which counts
//! as one operation. For snapshots whose statements all carry GUIDs,
//! `patch(a, diff(a, b)) == b`, and the diff is empty exactly when the two
//! are equal.
//!
//! [`EntityPatcher`] replays a diff onto a third snapshot. Patching is not
//! conflict-aware: changes and additions overwrite whatever is present, and
//! removals only act when the current value is the one the diff recorded.
//! Detecting what got lost is left to whoever re-diffs the result.

mod differ;
mod entity_diff;
mod ops;
mod patcher;

pub use differ::EntityDiffer;
pub use entity_diff::{EntityDiff, StatementDiff, StatementOp};
pub use ops::{DiffOp, ListDiff, ListInsert, MapDiff};
pub use patcher::EntityPatcher;

use wbedit_model::{EntityId, EntityType, StatementGuid};

/// Result type for patching.
pub type PatchResult<T> = Result<T, PatchError>;

/// A diff that cannot be applied to the target entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("{0} entities do not have site links")]
    SiteLinksUnsupported(EntityType),

    #[error("statement {guid} does not belong to {target}")]
    ForeignGuid {
        guid: StatementGuid,
        target: EntityId,
    },
}
