//! Change ops for wbedit.
//!
//! A [`ChangeOp`] is one atomic, validatable mutation of an entity: a label,
//! an alias list, a site link, a statement or one of its qualifiers,
//! references or rank. [`ChangeOps`] runs several in order and aborts on the
//! first failure.
//!
//! Application always works on an owned working copy. A failed op drops
//! that copy, so the snapshot a caller started from is never modified.
//!
//! [`ChangeOpsMerge`] folds one entity into another using the same ops,
//! with a per-field conflict policy.

mod context;
mod error;
mod fingerprint;
mod merge;
mod op;
mod ops;
mod site_links;
mod statements;

pub use context::ChangeOpContext;
pub use error::{ChangeOpError, ChangeOpResult, MergeError, MergeResult};
pub use merge::{ChangeOpsMerge, ConflictKind, IgnoreConflicts, MergedEntities};
pub use op::ChangeOp;
pub use ops::ChangeOps;
