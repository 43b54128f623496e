use pretty_assertions::assert_eq;
use wbedit_model::{
    Entity, EntityId, EntityType, ModelError, PropertyId, SiteLink, Snak, Statement,
    StatementGuid, Summary,
};

fn q(n: u64) -> EntityId {
    EntityId::item(n).unwrap()
}

fn p(n: u64) -> PropertyId {
    PropertyId::new(n).unwrap()
}

// ── Construction & ids ───────────────────────────────────────────

#[test]
fn new_item_has_no_id_and_no_content() {
    let e = Entity::new_item();
    assert_eq!(e.id, None);
    assert_eq!(e.entity_type, EntityType::Item);
    assert!(e.is_empty());
    assert!(e.supports_site_links());
}

#[test]
fn property_carries_data_type_and_no_site_links() {
    let e = Entity::property(EntityId::property(31).unwrap(), "wikibase-item").unwrap();
    assert_eq!(e.data_type.as_deref(), Some("wikibase-item"));
    assert!(!e.supports_site_links());
}

#[test]
fn set_id_rejects_wrong_type() {
    let mut e = Entity::new_item();
    let err = e.set_id(EntityId::property(1).unwrap()).unwrap_err();
    assert!(matches!(err, ModelError::IdTypeMismatch { .. }));
    assert_eq!(e.id, None);
}

#[test]
fn set_id_never_replaces_an_existing_id() {
    let mut e = Entity::item(q(1)).unwrap();
    assert!(e.set_id(q(1)).is_ok());
    assert_eq!(e.set_id(q(2)).unwrap_err(), ModelError::IdAlreadySet(q(1)));
}

// ── Fingerprint ──────────────────────────────────────────────────

#[test]
fn labels_are_unique_per_language() {
    let mut e = Entity::item(q(1)).unwrap();
    e.fingerprint.labels.set_text("en", "Berlin");
    let old = e.fingerprint.labels.set_text("en", "Berlin2");
    assert_eq!(old.unwrap().text, "Berlin");
    assert_eq!(e.fingerprint.labels.len(), 1);
    assert_eq!(e.label("en"), Some("Berlin2"));
}

#[test]
fn alias_groups_deduplicate_and_drop_when_empty() {
    let mut e = Entity::new_item();
    e.fingerprint
        .aliases
        .add_texts("en", vec!["a".into(), "b".into(), "a".into()]);
    assert_eq!(e.fingerprint.aliases.texts("en"), ["a", "b"]);

    e.fingerprint.aliases.remove_texts("en", &["a".into(), "b".into()]);
    assert!(e.fingerprint.aliases.get("en").is_none());
    assert!(e.fingerprint.aliases.is_empty());
}

#[test]
fn clear_keeps_identity() {
    let mut e = Entity::item(q(3)).unwrap();
    e.fingerprint.labels.set_text("en", "x");
    e.site_links.set(SiteLink::new("enwiki", "X"));
    e.statements.push(Statement::new(Snak::no_value(p(1)))).unwrap();
    e.clear();
    assert!(e.is_empty());
    assert_eq!(e.id, Some(q(3)));
}

// ── Statements ───────────────────────────────────────────────────

#[test]
fn statement_list_rejects_duplicate_guid() {
    let guid = StatementGuid::new(q(1), "abc").unwrap();
    let mut e = Entity::item(q(1)).unwrap();
    e.statements
        .push(Statement::new(Snak::some_value(p(1))).with_guid(guid.clone()))
        .unwrap();
    let err = e
        .statements
        .push(Statement::new(Snak::no_value(p(2))).with_guid(guid.clone()))
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateGuid(guid));
    assert_eq!(e.statements.len(), 1);
}

#[test]
fn statement_lookup_and_removal_by_guid() {
    let guid = StatementGuid::new(q(1), "abc").unwrap();
    let mut e = Entity::item(q(1)).unwrap();
    e.statements
        .push(Statement::new(Snak::string(p(10), "x")).with_guid(guid.clone()))
        .unwrap();
    assert_eq!(e.statements.get_by_guid(&guid).unwrap().property_id(), p(10));
    assert_eq!(e.statements.index_of_guid(&guid), Some(0));
    assert!(e.statements.remove_by_guid(&guid).is_some());
    assert!(e.statements.get_by_guid(&guid).is_none());
}

#[test]
fn reorder_moves_listed_statements_within_their_slots() {
    let guid = |key: &str| StatementGuid::new(q(1), key).unwrap();
    let mut e = Entity::item(q(1)).unwrap();
    for key in ["a", "b", "c"] {
        e.statements
            .push(Statement::new(Snak::string(p(10), key)).with_guid(guid(key)))
            .unwrap();
    }
    e.statements.push(Statement::new(Snak::no_value(p(11)))).unwrap();

    e.statements.reorder(&[guid("c"), guid("x"), guid("a")]);
    let keys: Vec<Option<&str>> = e
        .statements
        .iter()
        .map(|s| s.guid.as_ref().map(StatementGuid::key))
        .collect();
    assert_eq!(keys, vec![Some("c"), Some("b"), Some("a"), None]);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn entity_serde_roundtrip() {
    let mut e = Entity::item(q(1)).unwrap();
    e.fingerprint.labels.set_text("en", "Berlin");
    e.site_links.set(SiteLink::new("dewiki", "Berlin").with_badges([q(17)]));
    e.statements
        .push(
            Statement::new(Snak::string(p(10), "x"))
                .with_guid(StatementGuid::new(q(1), "g1").unwrap()),
        )
        .unwrap();

    let json = serde_json::to_string(&e).unwrap();
    let back: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, e);
}

// ── Summary ──────────────────────────────────────────────────────

#[test]
fn summary_accumulates_fragments() {
    let mut s = Summary::new("wbsetlabel");
    s.set_action("set");
    s.set_language("en");
    s.add_auto_summary_args([serde_json::json!("Berlin")]);
    assert_eq!(s.message_key().as_deref(), Some("wbsetlabel-set"));
    assert_eq!(s.language(), Some("en"));
    assert_eq!(s.auto_summary_args().len(), 1);
    assert!(s.auto_comment_args().is_empty());
}
