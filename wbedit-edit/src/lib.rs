//! Edits against a shared, versioned entity store.
//!
//! Two editors may load the same revision and save concurrently. There is no
//! lock: [`EditEntity`] replays the second editor's change on top of the
//! first one's revision with the three-way [`resolve`], and relies on the
//! store's compare-and-swap to catch anything that slips in between.
//!
//! [`MergeItems`] folds one item into another on top of the same pipeline.
//!
//! Storage and policy are reached through the traits in this crate;
//! [`MemoryEntityStore`] and the stock policies are enough to run the
//! pipeline end to end.

mod collaborators;
mod config;
mod edit_entity;
mod error;
mod flags;
mod memory;
mod merge_items;
pub mod policies;
mod resolver;
mod services;

pub use collaborators::{
    Actor, EditAction, EditFilterHookRunner, EditFlags, EditTokenChecker, EntityRevisionLookup,
    EntityStore, FilterResult, PermissionChecker, PermissionResult, RateLimiter,
    RevisionSelector, SummaryFormatter, WatchlistUpdater,
};
pub use config::{EditConfig, EngineConfig};
pub use edit_entity::{EditEntity, EditState, SavedEdit};
pub use error::{ConflictError, EditError, EditResult, LookupError, StoreError};
pub use flags::EditErrorFlags;
pub use memory::MemoryEntityStore;
pub use merge_items::{MergeItems, MergeOutcome};
pub use resolver::{Resolution, ResolutionWarning, resolve};
pub use services::EditServices;
