//! The checkpointed save pipeline for one entity edit.

use crate::resolver::{ResolutionWarning, resolve};
use crate::{
    Actor, EditAction, EditError, EditErrorFlags, EditFlags, EditResult, EditServices,
    FilterResult, LookupError, PermissionResult, RevisionSelector,
};
use tracing::{debug, info, warn};
use wbedit_model::{Entity, EntityId, EntityRevision, RevisionId, Summary};

/// How far an edit attempt got.
///
/// A failed checkpoint leaves the state at the last one passed, except for
/// the three checkpoints with a dedicated fatal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    New,
    TokenChecked,
    PermissionChecked,
    RateLimited,
    BaseAndLatestLoaded,
    /// No concurrent revision, or nothing to reconcile.
    ConflictChecked,
    /// The edit was replayed on top of a concurrent revision.
    ConflictFixed,
    ConflictFatal,
    PreconditionsChecked,
    FilterChecked,
    Saved,
    SaveFailed,
    WatchlistUpdated,
}

/// A successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEdit {
    pub revision_id: RevisionId,
    /// The entity as saved, after conflict resolution.
    pub entity: Entity,
}

/// One attempt by one actor to save a new version of an entity that they
/// edited starting from `base_revision`.
///
/// Checkpoints run in order and the first failure aborts the attempt. The
/// failing checkpoint's bit stays readable through [`Self::error_flags`].
pub struct EditEntity<'a> {
    services: &'a EditServices,
    actor: Actor,
    entity_id: EntityId,
    base_revision: Option<RevisionId>,
    watch: Option<bool>,
    state: EditState,
    error_flags: EditErrorFlags,
    warnings: Vec<ResolutionWarning>,
    latest: Option<EntityRevision>,
}

impl<'a> EditEntity<'a> {
    /// `base_revision` is the revision the edit started from; `None` edits
    /// the latest revision, or creates the entity.
    pub fn new(
        services: &'a EditServices,
        actor: Actor,
        entity_id: EntityId,
        base_revision: Option<RevisionId>,
    ) -> Self {
        Self {
            services,
            actor,
            entity_id,
            base_revision,
            watch: None,
            state: EditState::New,
            error_flags: EditErrorFlags::empty(),
            warnings: Vec::new(),
            latest: None,
        }
    }

    /// Overrides the configured watch flag.
    #[must_use]
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = Some(watch);
        self
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn error_flags(&self) -> EditErrorFlags {
        self.error_flags
    }

    pub fn has_error(&self, flags: EditErrorFlags) -> bool {
        self.error_flags.intersects(flags)
    }

    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    /// The latest revision as loaded during the attempt.
    pub fn latest_revision(&self) -> Option<&EntityRevision> {
        self.latest.as_ref()
    }

    /// Runs every checkpoint and saves `entity`.
    pub fn attempt_save(
        &mut self,
        entity: Entity,
        summary: &Summary,
        flags: EditFlags,
        token: &str,
    ) -> EditResult<SavedEdit> {
        if self.state != EditState::New {
            return self.fail(EditError::Precondition("edit was already attempted".to_string()));
        }
        let action = if flags.new {
            EditAction::Create
        } else {
            EditAction::Edit
        };

        self.check_token(token)?;
        self.check_permission(action, &entity)?;
        self.check_rate_limit(action)?;
        let base = self.load_base_and_latest()?;
        let target = self.fix_edit_conflict(base, entity)?;
        self.check_preconditions(&target, flags)?;
        let rendered = self.services.summaries.render(summary);
        self.run_filters(&target, &rendered)?;
        let revision_id = self.save(&target, summary, flags)?;
        self.update_watchlist();

        Ok(SavedEdit {
            revision_id,
            entity: target,
        })
    }

    fn fail<T>(&mut self, err: EditError) -> EditResult<T> {
        let flag = err.flag();
        warn!(
            "edit of {} by {} failed ({}): {}",
            self.entity_id, self.actor, flag, err
        );
        self.error_flags.insert(flag);
        Err(err)
    }

    // ── Checkpoints ──────────────────────────────────────────────

    fn check_token(&mut self, token: &str) -> EditResult<()> {
        if !self.services.tokens.check(&self.actor, token) {
            return self.fail(EditError::BadToken);
        }
        self.state = EditState::TokenChecked;
        Ok(())
    }

    fn check_permission(&mut self, action: EditAction, entity: &Entity) -> EditResult<()> {
        let result = self.services.permissions.check(&self.actor, action, entity);
        if let PermissionResult::Denied(reason) = result {
            return self.fail(EditError::PermissionDenied(reason));
        }
        self.state = EditState::PermissionChecked;
        Ok(())
    }

    fn check_rate_limit(&mut self, action: EditAction) -> EditResult<()> {
        if self.services.rate_limiter.is_limited(&self.actor, action) {
            self.state = EditState::RateLimited;
            return self.fail(EditError::RateLimited);
        }
        Ok(())
    }

    /// Loads the latest revision, plus the base revision when it differs.
    fn load_base_and_latest(&mut self) -> EditResult<Option<EntityRevision>> {
        let services = self.services;
        let lookup = services.lookup();
        let latest = match lookup.get_entity_revision(&self.entity_id, RevisionSelector::Latest) {
            Ok(latest) => latest,
            Err(e) => return self.fail(e.into()),
        };

        let base = match (self.base_revision, &latest) {
            (Some(base), Some(current)) if base != current.revision_id => {
                match lookup.get_entity_revision(&self.entity_id, RevisionSelector::Revision(base))
                {
                    Ok(Some(revision)) => Some(revision),
                    Ok(None) => {
                        let err = LookupError::BadRevision {
                            entity: self.entity_id,
                            revision: base,
                        };
                        return self.fail(err.into());
                    }
                    Err(e) => return self.fail(e.into()),
                }
            }
            _ => None,
        };

        self.latest = latest;
        self.state = EditState::BaseAndLatestLoaded;
        Ok(base)
    }

    /// Without a distinct base there is nothing to reconcile and `mine` is
    /// saved as is.
    fn fix_edit_conflict(
        &mut self,
        base: Option<EntityRevision>,
        mine: Entity,
    ) -> EditResult<Entity> {
        let (Some(base), Some(latest)) = (base, self.latest.as_ref()) else {
            self.state = EditState::ConflictChecked;
            return Ok(mine);
        };
        debug!(
            "{} changed since revision {} (latest {}), resolving",
            self.entity_id, base.revision_id, latest.revision_id
        );

        let same_actor =
            latest.author == self.actor.name && self.services.config.allow_self_conflict_patch;
        match resolve(&base.entity, &latest.entity, &mine, same_actor) {
            Ok(resolution) => {
                info!(
                    "resolved edit conflict on {}: {} of {} ops kept",
                    self.entity_id, resolution.clean_size, resolution.patch_size
                );
                self.warnings.extend(resolution.warnings);
                self.state = EditState::ConflictFixed;
                Ok(resolution.target)
            }
            Err(source) => {
                self.state = EditState::ConflictFatal;
                let entity = self.entity_id;
                self.fail(EditError::ConflictUnresolvable { entity, source })
            }
        }
    }

    fn check_preconditions(&mut self, target: &Entity, flags: EditFlags) -> EditResult<()> {
        let id = self.entity_id;
        let violation = if target.id != Some(id) {
            Some(format!("entity id {:?} does not match {id}", target.id))
        } else if target.entity_type != id.entity_type() {
            Some(format!("{id} cannot hold a {}", target.entity_type))
        } else if flags.new && self.latest.is_some() {
            Some(format!("{id} already exists"))
        } else if !flags.new && self.latest.is_none() {
            Some(format!("{id} does not exist"))
        } else {
            None
        };
        if let Some(reason) = violation {
            return self.fail(EditError::Precondition(reason));
        }
        self.state = EditState::PreconditionsChecked;
        Ok(())
    }

    fn run_filters(&mut self, target: &Entity, summary: &str) -> EditResult<()> {
        let result = self.services.filters.run(target, &self.actor, summary);
        if let FilterResult::Reject(reason) = result {
            return self.fail(EditError::Filtered(reason));
        }
        self.state = EditState::FilterChecked;
        Ok(())
    }

    /// Saves against the latest revision loaded, which the store compares
    /// atomically with its own.
    fn save(&mut self, target: &Entity, summary: &Summary, flags: EditFlags) -> EditResult<RevisionId> {
        let expected = self.latest.as_ref().map(|r| r.revision_id);
        let result = self
            .services
            .store
            .save_entity(target, summary, &self.actor, flags, expected);
        match result {
            Ok(revision_id) => {
                info!("saved {} as revision {revision_id}", self.entity_id);
                self.state = EditState::Saved;
                Ok(revision_id)
            }
            Err(e) => {
                self.state = EditState::SaveFailed;
                self.fail(e.into())
            }
        }
    }

    fn update_watchlist(&mut self) {
        let watch = self.watch.unwrap_or(self.services.config.watch_on_edit);
        self.services
            .watchlist
            .update(&self.actor, &self.entity_id, watch);
        self.state = EditState::WatchlistUpdated;
    }
}
