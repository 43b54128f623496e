//! Narrow interfaces to the services an edit depends on.
//!
//! Storage, policy, filtering and watch-list bookkeeping live outside this
//! workspace. The edit pipeline only sees these traits, so callers share
//! implementations behind `Arc` across request threads.

use crate::{LookupError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use wbedit_model::{Entity, EntityId, EntityRedirect, EntityRevision, RevisionId, Summary};

/// The user (or bot) an edit is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Flags passed through to the store with each save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFlags {
    /// The entity must not exist yet.
    pub new: bool,
    pub minor: bool,
    pub bot: bool,
}

impl EditFlags {
    /// Flags for creating an entity.
    #[must_use]
    pub fn create() -> Self {
        Self {
            new: true,
            ..Self::default()
        }
    }
}

/// Which revision of an entity to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSelector {
    Latest,
    Revision(RevisionId),
}

/// The kind of action a permission or rate-limit check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Edit,
    Create,
    Merge,
}

impl EditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Create => "create",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionResult {
    Allowed,
    Denied(String),
}

impl PermissionResult {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    Pass,
    Reject(String),
}

/// Persists entity revisions.
pub trait EntityStore: Send + Sync {
    /// Saves `entity` as a new revision.
    ///
    /// Must atomically compare `base` with the current latest revision and
    /// fail with [`StoreError::Conflict`] if they differ.
    fn save_entity(
        &self,
        entity: &Entity,
        summary: &Summary,
        actor: &Actor,
        flags: EditFlags,
        base: Option<RevisionId>,
    ) -> Result<RevisionId, StoreError>;

    /// Turns the redirect's source into a redirect to its target.
    fn save_redirect(
        &self,
        redirect: &EntityRedirect,
        summary: &Summary,
        actor: &Actor,
        flags: EditFlags,
    ) -> Result<RevisionId, StoreError>;
}

/// Loads entity revisions. `Ok(None)` means the entity does not exist.
pub trait EntityRevisionLookup: Send + Sync {
    fn get_entity_revision(
        &self,
        id: &EntityId,
        selector: RevisionSelector,
    ) -> Result<Option<EntityRevision>, LookupError>;
}

pub trait PermissionChecker: Send + Sync {
    fn check(&self, actor: &Actor, action: EditAction, entity: &Entity) -> PermissionResult;
}

pub trait RateLimiter: Send + Sync {
    fn is_limited(&self, actor: &Actor, action: EditAction) -> bool;
}

pub trait EditTokenChecker: Send + Sync {
    fn check(&self, actor: &Actor, token: &str) -> bool;
}

/// Runs site edit filters over the entity about to be saved.
pub trait EditFilterHookRunner: Send + Sync {
    fn run(&self, entity: &Entity, actor: &Actor, summary: &str) -> FilterResult;
}

/// Renders a structured summary to text.
pub trait SummaryFormatter: Send + Sync {
    fn render(&self, summary: &Summary) -> String;
}

pub trait WatchlistUpdater: Send + Sync {
    fn update(&self, actor: &Actor, id: &EntityId, watch: bool);
}
