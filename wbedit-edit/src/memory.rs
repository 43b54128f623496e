//! In-memory entity store.

use crate::{
    Actor, EditFlags, EntityRevisionLookup, EntityStore, LookupError, RevisionSelector,
    StoreError,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use wbedit_model::{Entity, EntityId, EntityRedirect, EntityRevision, RevisionId, Summary};

#[derive(Default)]
struct StoreState {
    history: BTreeMap<EntityId, Vec<EntityRevision>>,
    redirects: BTreeMap<EntityId, EntityId>,
    last_revision: u64,
}

impl StoreState {
    fn latest(&self, id: &EntityId) -> Option<&EntityRevision> {
        self.history.get(id).and_then(|revisions| revisions.last())
    }

    fn next_revision(&mut self) -> RevisionId {
        self.last_revision += 1;
        RevisionId::new(self.last_revision)
    }
}

/// Keeps every revision in memory and performs a real compare-and-swap on
/// the base revision. Revision ids are global and increasing.
#[derive(Default)]
pub struct MemoryEntityStore {
    state: Mutex<StoreState>,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

impl MemoryEntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Failure(format!("store lock poisoned: {e}")))
    }

    /// The redirect target of `id`, if it has been merged away.
    #[must_use]
    pub fn redirect_target(&self, id: &EntityId) -> Option<EntityId> {
        self.lock().ok()?.redirects.get(id).copied()
    }

    /// Number of stored revisions of `id`.
    #[must_use]
    pub fn revision_count(&self, id: &EntityId) -> usize {
        self.lock()
            .map(|state| state.history.get(id).map_or(0, Vec::len))
            .unwrap_or_default()
    }
}

impl EntityStore for MemoryEntityStore {
    fn save_entity(
        &self,
        entity: &Entity,
        _summary: &Summary,
        actor: &Actor,
        flags: EditFlags,
        base: Option<RevisionId>,
    ) -> Result<RevisionId, StoreError> {
        let id = entity.id.ok_or(StoreError::MissingId)?;
        let mut state = self.lock()?;
        if state.redirects.contains_key(&id) {
            return Err(StoreError::IsRedirect(id));
        }

        let current = state.latest(&id).map(|r| r.revision_id);
        match (flags.new, current) {
            (true, Some(_)) => return Err(StoreError::AlreadyExists(id)),
            (false, None) => return Err(StoreError::NotFound(id)),
            (false, Some(actual)) if base != Some(actual) => {
                debug!("compare-and-swap failed for {id}: base {base:?}, latest {actual}");
                return Err(StoreError::Conflict {
                    entity: id,
                    expected: base,
                    actual: Some(actual),
                });
            }
            _ => {}
        }

        let revision_id = state.next_revision();
        state.history.entry(id).or_default().push(EntityRevision {
            entity: entity.clone(),
            revision_id,
            timestamp: now_millis(),
            author: actor.name.clone(),
        });
        debug!("saved {id} as revision {revision_id}");
        Ok(revision_id)
    }

    fn save_redirect(
        &self,
        redirect: &EntityRedirect,
        _summary: &Summary,
        _actor: &Actor,
        _flags: EditFlags,
    ) -> Result<RevisionId, StoreError> {
        let mut state = self.lock()?;
        if !state.history.contains_key(&redirect.source) {
            return Err(StoreError::NotFound(redirect.source));
        }
        if state.latest(&redirect.target).is_none() {
            return Err(StoreError::NotFound(redirect.target));
        }
        state.redirects.insert(redirect.source, redirect.target);
        let revision_id = state.next_revision();
        debug!(
            "redirected {} to {} at revision {revision_id}",
            redirect.source, redirect.target
        );
        Ok(revision_id)
    }
}

impl EntityRevisionLookup for MemoryEntityStore {
    fn get_entity_revision(
        &self,
        id: &EntityId,
        selector: RevisionSelector,
    ) -> Result<Option<EntityRevision>, LookupError> {
        let state = self
            .state
            .lock()
            .map_err(|e| LookupError::Failure(format!("store lock poisoned: {e}")))?;
        if let Some(target) = state.redirects.get(id) {
            return Err(LookupError::UnresolvedRedirect {
                redirect: *id,
                target: *target,
            });
        }
        let Some(revisions) = state.history.get(id) else {
            return Ok(None);
        };
        match selector {
            RevisionSelector::Latest => Ok(revisions.last().cloned()),
            RevisionSelector::Revision(revision) => revisions
                .iter()
                .find(|r| r.revision_id == revision)
                .cloned()
                .map(Some)
                .ok_or(LookupError::BadRevision {
                    entity: *id,
                    revision,
                }),
        }
    }
}
