use pretty_assertions::assert_eq;
use std::sync::Arc;
use wbedit_changeop::{ChangeOpContext, ConflictKind, IgnoreConflicts, MergeError};
use wbedit_edit::{
    Actor, EditAction, EditEntity, EditError, EditFilterHookRunner, EditFlags, EditServices,
    EntityRevisionLookup, FilterResult, LookupError, MemoryEntityStore, MergeItems,
    PermissionChecker, PermissionResult, RevisionSelector,
};
use wbedit_model::{Entity, EntityId, SiteLink, Summary};
use wbedit_validation::{EditValidators, PropertyDataTypes, ValidationLimits};

const TOKEN: &str = "+\\";

fn q(n: u64) -> EntityId {
    EntityId::item(n).unwrap()
}

fn make_ctx() -> ChangeOpContext {
    let validators =
        EditValidators::new(&ValidationLimits::default(), Arc::new(PropertyDataTypes::new()))
            .unwrap();
    ChangeOpContext::with_uuid_guids(validators)
}

fn make_item(n: u64, links: &[(&str, &str)]) -> Entity {
    let mut entity = Entity::item(q(n)).unwrap();
    for (site, page) in links {
        entity.site_links.set(SiteLink::new(*site, *page));
    }
    entity
}

fn seed(services: &EditServices, entity: Entity) {
    let id = entity.id.unwrap();
    EditEntity::new(services, Actor::new("seed"), id, None)
        .attempt_save(entity, &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap();
}

fn latest(store: &MemoryEntityStore, id: EntityId) -> Entity {
    store
        .get_entity_revision(&id, RevisionSelector::Latest)
        .unwrap()
        .unwrap()
        .entity
}

/// Rejects every save of one entity.
struct RejectEntity(EntityId);

impl EditFilterHookRunner for RejectEntity {
    fn run(&self, entity: &Entity, _actor: &Actor, _summary: &str) -> FilterResult {
        if entity.id == Some(self.0) {
            FilterResult::Reject(format!("{} is protected", self.0))
        } else {
            FilterResult::Pass
        }
    }
}

/// Allows everything except merging.
struct NoMerges;

impl PermissionChecker for NoMerges {
    fn check(&self, _actor: &Actor, action: EditAction, _entity: &Entity) -> PermissionResult {
        match action {
            EditAction::Merge => PermissionResult::Denied("merging is disabled".to_string()),
            _ => PermissionResult::Allowed,
        }
    }
}

// ── Successful merges ────────────────────────────────────────────

#[test]
fn merge_moves_site_link_and_redirects() {
    let store = Arc::new(MemoryEntityStore::new());
    let services = EditServices::new(store.clone(), store.clone());
    let mut from = make_item(1, &[("dewiki", "Foo")]);
    from.fingerprint.labels.set_text("en", "Foo");
    seed(&services, from);
    seed(&services, make_item(2, &[]));

    let ctx = make_ctx();
    let outcome = MergeItems::new(&services, &ctx)
        .merge(
            q(1),
            q(2),
            &IgnoreConflicts::none(),
            &Actor::new("alice"),
            TOKEN,
            Some("duplicate"),
        )
        .unwrap();
    assert!(outcome.to_revision < outcome.from_revision);
    assert!(outcome.from_revision < outcome.redirect_revision);

    let to = latest(&store, q(2));
    assert_eq!(to.site_links.get("dewiki").unwrap().page_name, "Foo");
    assert_eq!(to.label("en"), Some("Foo"));
    assert_eq!(store.revision_count(&q(1)), 2);
    assert_eq!(store.redirect_target(&q(1)), Some(q(2)));
    assert_eq!(
        store.get_entity_revision(&q(1), RevisionSelector::Latest),
        Err(LookupError::UnresolvedRedirect {
            redirect: q(1),
            target: q(2),
        })
    );
}

// ── Failures ─────────────────────────────────────────────────────

#[test]
fn site_link_conflict_modifies_nothing() {
    let store = Arc::new(MemoryEntityStore::new());
    let services = EditServices::new(store.clone(), store.clone());
    seed(&services, make_item(1, &[("dewiki", "Foo")]));
    seed(&services, make_item(2, &[("dewiki", "Bar")]));

    let ctx = make_ctx();
    let err = MergeItems::new(&services, &ctx)
        .merge(
            q(1),
            q(2),
            &IgnoreConflicts::none(),
            &Actor::new("alice"),
            TOKEN,
            None,
        )
        .unwrap_err();
    assert_eq!(
        err,
        EditError::Merge(MergeError::Conflict {
            kind: ConflictKind::SiteLink,
            key: "dewiki".to_string(),
        })
    );
    assert_eq!(latest(&store, q(1)), make_item(1, &[("dewiki", "Foo")]));
    assert_eq!(latest(&store, q(2)), make_item(2, &[("dewiki", "Bar")]));
    assert_eq!(store.revision_count(&q(1)), 1);
    assert_eq!(store.revision_count(&q(2)), 1);
}

#[test]
fn failed_target_save_leaves_source_untouched() {
    let store = Arc::new(MemoryEntityStore::new());
    let seeding = EditServices::new(store.clone(), store.clone());
    seed(&seeding, make_item(1, &[("dewiki", "Foo")]));
    seed(&seeding, make_item(2, &[]));

    let services = seeding.with_filters(Arc::new(RejectEntity(q(2))));
    let ctx = make_ctx();
    let err = MergeItems::new(&services, &ctx)
        .merge(
            q(1),
            q(2),
            &IgnoreConflicts::none(),
            &Actor::new("alice"),
            TOKEN,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, EditError::Filtered(_)));
    assert_eq!(latest(&store, q(1)), make_item(1, &[("dewiki", "Foo")]));
    assert_eq!(store.revision_count(&q(1)), 1);
    assert_eq!(store.redirect_target(&q(1)), None);
}

#[test]
fn merge_needs_permission() {
    let store = Arc::new(MemoryEntityStore::new());
    let seeding = EditServices::new(store.clone(), store.clone());
    seed(&seeding, make_item(1, &[]));
    seed(&seeding, make_item(2, &[]));

    let services = seeding.with_permissions(Arc::new(NoMerges));
    let ctx = make_ctx();
    let err = MergeItems::new(&services, &ctx)
        .merge(
            q(1),
            q(2),
            &IgnoreConflicts::none(),
            &Actor::new("alice"),
            TOKEN,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, EditError::PermissionDenied(_)));
    assert_eq!(store.revision_count(&q(2)), 1);
}

#[test]
fn merge_of_missing_item_fails() {
    let store = Arc::new(MemoryEntityStore::new());
    let services = EditServices::new(store.clone(), store.clone());
    seed(&services, make_item(2, &[]));

    let ctx = make_ctx();
    let err = MergeItems::new(&services, &ctx)
        .merge(
            q(1),
            q(2),
            &IgnoreConflicts::none(),
            &Actor::new("alice"),
            TOKEN,
            None,
        )
        .unwrap_err();
    assert_eq!(err, EditError::Lookup(LookupError::NotFound(q(1))));
}
