use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use wbedit_edit::policies::DenyAllPolicy;
use wbedit_edit::{
    Actor, EditConfig, EditEntity, EditError, EditErrorFlags, EditFlags, EditServices, EditState,
    EntityRevisionLookup, EntityStore, LookupError, MemoryEntityStore, ResolutionWarning,
    RevisionSelector, SavedEdit, StoreError, WatchlistUpdater,
};
use wbedit_model::{Entity, EntityId, EntityRedirect, RevisionId, Summary};

const TOKEN: &str = "+\\";

fn q1() -> EntityId {
    EntityId::item(1).unwrap()
}

fn make_store() -> Arc<MemoryEntityStore> {
    Arc::new(MemoryEntityStore::new())
}

/// Set `RUST_LOG=wbedit_edit=debug` to see checkpoint decisions.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_services(store: &Arc<MemoryEntityStore>) -> EditServices {
    init_tracing();
    EditServices::new(store.clone(), store.clone())
}

fn make_item(labels: &[(&str, &str)]) -> Entity {
    let mut entity = Entity::item(q1()).unwrap();
    for (language, text) in labels {
        entity.fingerprint.labels.set_text(*language, *text);
    }
    entity
}

fn create(services: &EditServices, actor: &str, entity: Entity) -> SavedEdit {
    EditEntity::new(services, Actor::new(actor), q1(), None)
        .attempt_save(entity, &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap()
}

fn edit<'a>(
    services: &'a EditServices,
    actor: &str,
    base: RevisionId,
    entity: Entity,
) -> (EditEntity<'a>, Result<SavedEdit, EditError>) {
    let mut edit = EditEntity::new(services, Actor::new(actor), q1(), Some(base));
    let result = edit.attempt_save(entity, &Summary::default(), EditFlags::default(), TOKEN);
    (edit, result)
}

#[derive(Default)]
struct RecordingWatchlist {
    calls: Mutex<Vec<(String, EntityId, bool)>>,
}

impl WatchlistUpdater for RecordingWatchlist {
    fn update(&self, actor: &Actor, id: &EntityId, watch: bool) {
        self.calls.lock().unwrap().push((actor.name.clone(), *id, watch));
    }
}

/// Lets another editor save right before every save, so the
/// compare-and-swap always loses.
struct RacingStore {
    inner: Arc<MemoryEntityStore>,
}

impl EntityStore for RacingStore {
    fn save_entity(
        &self,
        entity: &Entity,
        summary: &Summary,
        actor: &Actor,
        flags: EditFlags,
        base: Option<RevisionId>,
    ) -> Result<RevisionId, StoreError> {
        if let Some(base) = base {
            let racer = Actor::new("racer");
            self.inner
                .save_entity(entity, summary, &racer, EditFlags::default(), Some(base))?;
        }
        self.inner.save_entity(entity, summary, actor, flags, base)
    }

    fn save_redirect(
        &self,
        redirect: &EntityRedirect,
        summary: &Summary,
        actor: &Actor,
        flags: EditFlags,
    ) -> Result<RevisionId, StoreError> {
        self.inner.save_redirect(redirect, summary, actor, flags)
    }
}

// ── Saving ───────────────────────────────────────────────────────

#[test]
fn create_then_edit() {
    let store = make_store();
    let services = make_services(&store);
    let created = create(&services, "alice", make_item(&[("en", "A")]));

    let (edit, result) = edit(&services, "alice", created.revision_id, make_item(&[("en", "B")]));
    let saved = result.unwrap();
    assert!(saved.revision_id > created.revision_id);
    assert_eq!(saved.entity, make_item(&[("en", "B")]));
    assert_eq!(edit.state(), EditState::WatchlistUpdated);
    assert!(edit.error_flags().is_empty());
    assert_eq!(store.revision_count(&q1()), 2);

    let latest = store
        .get_entity_revision(&q1(), RevisionSelector::Latest)
        .unwrap()
        .unwrap();
    assert_eq!(latest.entity, saved.entity);
    assert_eq!(latest.author, "alice");
}

#[test]
fn concurrent_edit_is_merged() {
    let store = make_store();
    let services = make_services(&store);
    let base = create(&services, "alice", make_item(&[("en", "A")])).revision_id;

    let (_, bob) = edit(&services, "bob", base, make_item(&[("en", "A"), ("de", "X")]));
    bob.unwrap();

    let (alice, result) = edit(&services, "alice", base, make_item(&[("en", "B")]));
    let saved = result.unwrap();
    assert_eq!(saved.entity, make_item(&[("en", "B"), ("de", "X")]));
    assert_eq!(alice.warnings(), [ResolutionWarning::ConflictResolved]);
    assert!(alice.error_flags().is_empty());
}

#[test]
fn lost_removal_is_an_edit_conflict() {
    let store = make_store();
    let services = make_services(&store);
    let mut described = make_item(&[]);
    described.fingerprint.descriptions.set_text("en", "x");
    let base = create(&services, "alice", described).revision_id;

    let (_, bob) = edit(&services, "bob", base, make_item(&[]));
    bob.unwrap();

    let (alice, result) = edit(&services, "alice", base, make_item(&[]));
    let err = result.unwrap_err();
    assert!(matches!(err, EditError::ConflictUnresolvable { .. }));
    assert_eq!(alice.error_flags(), EditErrorFlags::EDIT_CONFLICT);
    assert_eq!(alice.state(), EditState::ConflictFatal);
    assert_eq!(store.revision_count(&q1()), 2);
}

#[test]
fn self_conflict_is_patched() {
    let store = make_store();
    let services = make_services(&store);
    let mut start = make_item(&[("en", "A")]);
    start.fingerprint.descriptions.set_text("en", "x");
    let base = create(&services, "alice", start).revision_id;

    let (_, first) = edit(&services, "alice", base, make_item(&[("en", "A")]));
    first.unwrap();

    let (second, result) = edit(&services, "alice", base, make_item(&[("en", "B")]));
    assert_eq!(result.unwrap().entity, make_item(&[("en", "B")]));
    assert_eq!(
        second.warnings(),
        [ResolutionWarning::SelfConflictPatched { conflicts: 1 }]
    );
}

#[test]
fn self_conflict_patching_can_be_disabled() {
    let store = make_store();
    let services = make_services(&store).with_config(EditConfig {
        allow_self_conflict_patch: false,
        ..EditConfig::default()
    });
    let mut start = make_item(&[("en", "A")]);
    start.fingerprint.descriptions.set_text("en", "x");
    let base = create(&services, "alice", start).revision_id;

    let (_, first) = edit(&services, "alice", base, make_item(&[("en", "A")]));
    first.unwrap();

    let (second, result) = edit(&services, "alice", base, make_item(&[("en", "B")]));
    assert!(result.is_err());
    assert_eq!(second.error_flags(), EditErrorFlags::EDIT_CONFLICT);
}

#[test]
fn watchlist_gets_configured_flag() {
    let store = make_store();
    let watchlist = Arc::new(RecordingWatchlist::default());
    let services = make_services(&store)
        .with_watchlist(watchlist.clone())
        .with_config(EditConfig {
            watch_on_edit: true,
            ..EditConfig::default()
        });
    let base = create(&services, "alice", make_item(&[])).revision_id;

    EditEntity::new(&services, Actor::new("bob"), q1(), Some(base))
        .with_watch(false)
        .attempt_save(make_item(&[("en", "A")]), &Summary::default(), EditFlags::default(), TOKEN)
        .unwrap();

    let calls = watchlist.calls.lock().unwrap();
    assert_eq!(
        *calls,
        [("alice".to_string(), q1(), true), ("bob".to_string(), q1(), false)]
    );
}

// ── Checkpoints ──────────────────────────────────────────────────

#[test]
fn bad_token_stops_first() {
    let store = make_store();
    let services = make_services(&store).with_tokens(Arc::new(DenyAllPolicy));
    let mut edit = EditEntity::new(&services, Actor::new("alice"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), "bad")
        .unwrap_err();
    assert_eq!(err, EditError::BadToken);
    assert_eq!(edit.error_flags(), EditErrorFlags::TOKEN);
    assert_eq!(edit.state(), EditState::New);
    assert_eq!(store.revision_count(&q1()), 0);
}

#[test]
fn permission_denied() {
    let store = make_store();
    let services = make_services(&store).with_permissions(Arc::new(DenyAllPolicy));
    let mut edit = EditEntity::new(&services, Actor::new("alice"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::PermissionDenied(_)));
    assert_eq!(edit.error_flags(), EditErrorFlags::PERMISSION);
    assert_eq!(edit.state(), EditState::TokenChecked);
}

#[test]
fn rate_limited() {
    let store = make_store();
    let services = make_services(&store).with_rate_limiter(Arc::new(DenyAllPolicy));
    let mut edit = EditEntity::new(&services, Actor::new("alice"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert_eq!(err, EditError::RateLimited);
    assert_eq!(edit.error_flags(), EditErrorFlags::RATE_LIMIT);
    assert_eq!(edit.state(), EditState::RateLimited);
}

#[test]
fn creating_existing_entity_fails_precondition() {
    let store = make_store();
    let services = make_services(&store);
    create(&services, "alice", make_item(&[]));

    let mut edit = EditEntity::new(&services, Actor::new("bob"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::Precondition(_)));
    assert_eq!(edit.error_flags(), EditErrorFlags::PRECONDITION);
    assert_eq!(edit.state(), EditState::ConflictChecked);
}

#[test]
fn editing_missing_entity_fails_precondition() {
    let store = make_store();
    let services = make_services(&store);
    let mut edit = EditEntity::new(&services, Actor::new("bob"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::default(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::Precondition(_)));
}

#[test]
fn mismatched_entity_id_fails_precondition() {
    let store = make_store();
    let services = make_services(&store);
    let other = Entity::item(EntityId::item(2).unwrap()).unwrap();
    let mut edit = EditEntity::new(&services, Actor::new("bob"), q1(), None);
    let err = edit
        .attempt_save(other, &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::Precondition(_)));
    assert_eq!(store.revision_count(&q1()), 0);
}

#[test]
fn unknown_base_revision_fails() {
    let store = make_store();
    let services = make_services(&store);
    create(&services, "alice", make_item(&[]));

    let (edit, result) = edit(&services, "alice", RevisionId::new(99), make_item(&[]));
    assert_eq!(
        result.unwrap_err(),
        EditError::Lookup(LookupError::BadRevision {
            entity: q1(),
            revision: RevisionId::new(99),
        })
    );
    assert_eq!(edit.error_flags(), EditErrorFlags::PRECONDITION);
}

#[test]
fn filtered_edit_is_not_saved() {
    let store = make_store();
    let services = make_services(&store).with_filters(Arc::new(DenyAllPolicy));
    let mut edit = EditEntity::new(&services, Actor::new("alice"), q1(), None);
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::Filtered(_)));
    assert_eq!(edit.error_flags(), EditErrorFlags::FILTERED);
    assert_eq!(edit.state(), EditState::PreconditionsChecked);
    assert_eq!(store.revision_count(&q1()), 0);
}

#[test]
fn lost_compare_and_swap_is_a_save_error() {
    let inner = make_store();
    let seed = make_services(&inner);
    let base = create(&seed, "alice", make_item(&[])).revision_id;

    let racing = Arc::new(RacingStore {
        inner: inner.clone(),
    });
    let services = EditServices::new(racing, inner.clone());
    let (edit, result) = edit(&services, "alice", base, make_item(&[("en", "A")]));
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        EditError::StorageConflict(StoreError::Conflict { .. })
    ));
    assert_eq!(edit.error_flags(), EditErrorFlags::SAVE);
    assert_eq!(edit.state(), EditState::SaveFailed);
}

#[test]
fn second_attempt_is_refused() {
    let store = make_store();
    let services = make_services(&store);
    let mut edit = EditEntity::new(&services, Actor::new("alice"), q1(), None);
    edit.attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap();
    let err = edit
        .attempt_save(make_item(&[]), &Summary::default(), EditFlags::create(), TOKEN)
        .unwrap_err();
    assert!(matches!(err, EditError::Precondition(_)));
    assert!(edit.has_error(EditErrorFlags::PRECONDITION));
}

#[test]
fn error_flag_display() {
    let flags = EditErrorFlags::TOKEN | EditErrorFlags::SAVE;
    assert_eq!(flags.to_string(), "token|save");
    assert!(EditErrorFlags::ANY.contains(flags));
    assert_eq!(EditErrorFlags::empty().to_string(), "none");
}

// ── Memory store ─────────────────────────────────────────────────

#[test]
fn memory_store_compare_and_swap() {
    let store = MemoryEntityStore::new();
    let alice = Actor::new("alice");
    let summary = Summary::default();
    let entity = make_item(&[]);

    let first = store
        .save_entity(&entity, &summary, &alice, EditFlags::create(), None)
        .unwrap();
    assert_eq!(
        store.save_entity(&entity, &summary, &alice, EditFlags::create(), None),
        Err(StoreError::AlreadyExists(q1()))
    );
    let second = store
        .save_entity(&entity, &summary, &alice, EditFlags::default(), Some(first))
        .unwrap();
    assert_eq!(
        store.save_entity(&entity, &summary, &alice, EditFlags::default(), Some(first)),
        Err(StoreError::Conflict {
            entity: q1(),
            expected: Some(first),
            actual: Some(second),
        })
    );

    let old = store
        .get_entity_revision(&q1(), RevisionSelector::Revision(first))
        .unwrap()
        .unwrap();
    assert_eq!(old.revision_id, first);
}

#[test]
fn memory_store_redirects() {
    let store = MemoryEntityStore::new();
    let alice = Actor::new("alice");
    let summary = Summary::default();
    let q2 = EntityId::item(2).unwrap();
    store
        .save_entity(&make_item(&[]), &summary, &alice, EditFlags::create(), None)
        .unwrap();
    store
        .save_entity(&Entity::item(q2).unwrap(), &summary, &alice, EditFlags::create(), None)
        .unwrap();

    let redirect = EntityRedirect {
        source: q1(),
        target: q2,
    };
    store
        .save_redirect(&redirect, &summary, &alice, EditFlags::default())
        .unwrap();
    assert_eq!(store.redirect_target(&q1()), Some(q2));
    assert_eq!(
        store.get_entity_revision(&q1(), RevisionSelector::Latest),
        Err(LookupError::UnresolvedRedirect {
            redirect: q1(),
            target: q2,
        })
    );
    assert_eq!(
        store.save_entity(&make_item(&[]), &summary, &alice, EditFlags::default(), None),
        Err(StoreError::IsRedirect(q1()))
    );
}
