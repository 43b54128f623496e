//! Merging one item into another and leaving a redirect behind.

use crate::{
    Actor, EditAction, EditEntity, EditError, EditFlags, EditResult, EditServices, LookupError,
    PermissionResult, RevisionSelector,
};
use serde_json::Value;
use tracing::info;
use wbedit_changeop::{ChangeOpContext, ChangeOpsMerge, IgnoreConflicts};
use wbedit_model::{EntityId, EntityRedirect, EntityRevision, RevisionId, Summary};

/// Revisions written by a successful merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub to_revision: RevisionId,
    pub from_revision: RevisionId,
    pub redirect_revision: RevisionId,
}

/// Folds the item `from` into `to`, empties `from` and redirects it.
///
/// Saves happen in order: `to`, then the emptied `from`, then the
/// redirect. If saving `to` fails nothing has been written.
pub struct MergeItems<'a> {
    services: &'a EditServices,
    ctx: &'a ChangeOpContext,
}

impl<'a> MergeItems<'a> {
    pub fn new(services: &'a EditServices, ctx: &'a ChangeOpContext) -> Self {
        Self { services, ctx }
    }

    pub fn merge(
        &self,
        from_id: EntityId,
        to_id: EntityId,
        ignore: &IgnoreConflicts,
        actor: &Actor,
        token: &str,
        user_summary: Option<&str>,
    ) -> EditResult<MergeOutcome> {
        let from = self.load(from_id)?;
        let to = self.load(to_id)?;
        for revision in [&from, &to] {
            let result = self
                .services
                .permissions
                .check(actor, EditAction::Merge, &revision.entity);
            if let PermissionResult::Denied(reason) = result {
                return Err(EditError::PermissionDenied(reason));
            }
        }

        let merged = ChangeOpsMerge::new(ignore.clone()).merge(&from.entity, &to.entity, self.ctx)?;

        let to_revision = EditEntity::new(self.services, actor.clone(), to_id, Some(to.revision_id))
            .attempt_save(
                merged.to,
                &merge_summary("to", from_id, user_summary),
                EditFlags::default(),
                token,
            )?
            .revision_id;

        let from_revision =
            EditEntity::new(self.services, actor.clone(), from_id, Some(from.revision_id))
                .attempt_save(
                    merged.from,
                    &merge_summary("from", to_id, user_summary),
                    EditFlags::default(),
                    token,
                )?
                .revision_id;

        let redirect = EntityRedirect {
            source: from_id,
            target: to_id,
        };
        let redirect_revision = self.services.store.save_redirect(
            &redirect,
            &merge_summary("redirect", to_id, user_summary),
            actor,
            EditFlags::default(),
        )?;

        info!("merged {from_id} into {to_id}");
        Ok(MergeOutcome {
            to_revision,
            from_revision,
            redirect_revision,
        })
    }

    fn load(&self, id: EntityId) -> EditResult<EntityRevision> {
        self.services
            .lookup
            .get_entity_revision(&id, RevisionSelector::Latest)?
            .ok_or(EditError::Lookup(LookupError::NotFound(id)))
    }
}

fn merge_summary(action: &str, other: EntityId, user_summary: Option<&str>) -> Summary {
    let mut summary = Summary::new("wbmergeitems");
    summary.set_action(action);
    summary.add_auto_comment_args([Value::from(other.to_string())]);
    if let Some(text) = user_summary {
        summary.set_user_summary(text);
    }
    summary
}
