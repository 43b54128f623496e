use pretty_assertions::assert_eq;
use std::sync::Arc;
use wbedit_model::{DataValue, Entity, EntityId, EntityType, PropertyId, SiteLink, Snak};
use wbedit_validation::{
    CompositeValidator, EditValidators, InMemoryTermIndex, LengthValidator, MembershipValidator,
    PropertyDataTypes, ValidationError, ValidationLimits, ValidationMode, ValidationResult,
    ValueValidator, WhitespaceValidator,
};

fn p(n: u64) -> PropertyId {
    PropertyId::new(n).unwrap()
}

fn q(n: u64) -> EntityId {
    EntityId::item(n).unwrap()
}

fn data_types() -> Arc<PropertyDataTypes> {
    Arc::new(
        PropertyDataTypes::new()
            .with(p(10), "string")
            .with(p(31), "wikibase-item"),
    )
}

fn validators() -> EditValidators {
    EditValidators::new(&ValidationLimits::default(), data_types()).unwrap()
}

// ── Composition ──────────────────────────────────────────────────

#[test]
fn fail_fast_stops_at_first_error() {
    let v: CompositeValidator<str> = CompositeValidator::new(ValidationMode::FailFast)
        .with(LengthValidator::new(1, 3))
        .with(WhitespaceValidator);
    let result = v.validate(" toolong ");
    assert_eq!(result.errors().len(), 1);
    assert!(result.has_code("too-long"));
}

#[test]
fn collect_all_reports_every_error() {
    let v: CompositeValidator<str> = CompositeValidator::new(ValidationMode::CollectAll)
        .with(LengthValidator::new(1, 3))
        .with(WhitespaceValidator);
    let result = v.validate(" toolong ");
    let codes: Vec<&str> = result.errors().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["too-long", "malformed"]);
}

#[test]
fn empty_composite_is_valid() {
    let v: CompositeValidator<str> = CompositeValidator::new(ValidationMode::CollectAll);
    assert!(v.is_empty());
    assert!(v.validate("anything").is_valid());
}

#[test]
fn membership_validator_reports_value() {
    let v = MembershipValidator::new(["en".to_string()], "unknown-language");
    let result = ValueValidator::<str>::validate(&v, "xx");
    assert!(result.has_code("unknown-language"));
    assert_eq!(result.errors()[0].context["value"], "xx");
}

#[test]
fn validation_result_merge_keeps_order() {
    let mut a = ValidationResult::invalid(ValidationError::new("a"));
    a.merge(ValidationResult::invalid(ValidationError::new("b")));
    let codes: Vec<&str> = a.errors().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["a", "b"]);
}

#[test]
fn ignoring_entity_drops_only_its_clashes() {
    let result = ValidationResult::invalid(ValidationError::new("clash").with("entity", q(1)))
        .merged(ValidationResult::invalid(ValidationError::new("clash").with("entity", q(2))))
        .merged(ValidationResult::invalid(ValidationError::new("malformed")));
    let kept = result.ignoring_entity(q(1));
    let entities: Vec<Option<&String>> =
        kept.errors().iter().map(|e| e.context.get("entity")).collect();
    assert_eq!(entities, vec![Some(&q(2).to_string()), None]);
}

// ── Terms ────────────────────────────────────────────────────────

#[test]
fn language_codes_follow_pattern_and_allow_list() {
    let limits = ValidationLimits {
        languages: vec!["en".into(), "de".into()],
        ..ValidationLimits::default()
    };
    let v = EditValidators::new(&limits, data_types()).unwrap();
    assert!(v.validate_language("en").is_valid());
    assert!(v.validate_language("EN").has_code("malformed"));
    assert!(v.validate_language("fr").has_code("unknown-language"));
}

#[test]
fn labels_have_length_limits() {
    let limits = ValidationLimits {
        max_term_length: 5,
        ..ValidationLimits::default()
    };
    let v = EditValidators::new(&limits, data_types()).unwrap();
    assert!(v.validate_label(EntityType::Item, "Berlin2").has_code("too-long"));
    assert!(v.validate_label(EntityType::Item, "").has_code("too-short"));
    assert!(v.validate_label(EntityType::Item, "Bonn").is_valid());
}

#[test]
fn padded_terms_are_malformed() {
    let v = validators();
    assert!(v.validate_description(" x").has_code("malformed"));
    assert!(v.validate_alias("a\tb").has_code("malformed"));
}

#[test]
fn property_labels_cannot_be_property_ids() {
    let v = validators();
    assert!(v.validate_label(EntityType::Property, "P31").has_code("label-is-entity-id"));
    assert!(v.validate_label(EntityType::Item, "P31").is_valid());
}

#[test]
fn invalid_pattern_fails_construction() {
    let limits = ValidationLimits {
        language_pattern: "(".into(),
        ..ValidationLimits::default()
    };
    assert!(EditValidators::new(&limits, data_types()).is_err());
}

// ── Snaks ────────────────────────────────────────────────────────

#[test]
fn snak_requires_known_property() {
    let v = validators();
    assert!(v.validate_snak(&Snak::no_value(p(999))).has_code("no-such-property"));
    assert!(v.validate_snak(&Snak::no_value(p(10))).is_valid());
}

#[test]
fn snak_value_type_must_match_data_type() {
    let v = validators();
    assert!(v.validate_snak(&Snak::string(p(10), "x")).is_valid());
    let wrong = Snak::value(p(31), DataValue::String("Q5".into()));
    let result = v.validate_snak(&wrong);
    assert!(result.has_code("bad-value-type"));
    assert_eq!(result.errors()[0].context["expected"], "wikibase-entityid");
    assert!(v
        .validate_snak(&Snak::value(p(31), DataValue::EntityId(q(5))))
        .is_valid());
}

// ── Site links ───────────────────────────────────────────────────

#[test]
fn badges_must_be_configured_items() {
    let limits = ValidationLimits {
        badges: vec!["Q17".into()],
        ..ValidationLimits::default()
    };
    let v = EditValidators::new(&limits, data_types()).unwrap();
    assert!(v.validate_badges([&q(17)]).is_valid());
    assert!(v.validate_badges([&q(18)]).has_code("not-a-badge"));
    assert!(v
        .validate_badges([&EntityId::property(17).unwrap()])
        .has_code("not-a-badge"));
}

#[test]
fn site_ids_follow_pattern() {
    let v = validators();
    assert!(v.validate_site_id("dewiki").is_valid());
    assert!(v.validate_site_id("De Wiki").has_code("malformed"));
}

#[test]
fn site_link_uniqueness_consults_lookup() {
    let mut other = Entity::item(q(2)).unwrap();
    other.site_links.set(SiteLink::new("dewiki", "Foo"));
    let index = Arc::new(InMemoryTermIndex::from_entities([&other]));
    let v = validators().with_site_link_conflicts(index);

    let link = SiteLink::new("dewiki", "Foo");
    assert!(v.validate_site_link_uniqueness(Some(q(1)), &link).has_code("sitelink-conflict"));
    assert!(v.validate_site_link_uniqueness(Some(q(2)), &link).is_valid());
    assert!(v
        .validate_site_link_uniqueness(Some(q(1)), &SiteLink::new("dewiki", "Bar"))
        .is_valid());
}

// ── Fingerprint uniqueness ───────────────────────────────────────

#[test]
fn item_label_description_pair_must_be_unique() {
    let mut other = Entity::item(q(2)).unwrap();
    other.fingerprint.labels.set_text("en", "Berlin");
    other.fingerprint.descriptions.set_text("en", "city");
    let index = Arc::new(InMemoryTermIndex::from_entities([&other]));
    let v = validators().with_duplicate_detector(index);

    let mut mine = Entity::item(q(1)).unwrap();
    mine.fingerprint.labels.set_text("en", "Berlin");
    assert!(v.validate_fingerprint_uniqueness(&mine).is_valid());

    mine.fingerprint.descriptions.set_text("en", "city");
    let result = v.validate_fingerprint_uniqueness(&mine);
    assert!(result.has_code("label-with-description-conflict"));
    assert_eq!(result.errors()[0].context["entity"], "Q2");

    // the entity never conflicts with itself
    assert!(v.validate_fingerprint_uniqueness(&other).is_valid());
}

#[test]
fn property_labels_must_be_unique() {
    let mut other = Entity::property(EntityId::property(2).unwrap(), "string").unwrap();
    other.fingerprint.labels.set_text("en", "instance of");
    let index = Arc::new(InMemoryTermIndex::from_entities([&other]));
    let v = validators().with_duplicate_detector(index);

    let mut mine = Entity::property(EntityId::property(1).unwrap(), "string").unwrap();
    mine.fingerprint.labels.set_text("en", "instance of");
    assert!(v.validate_fingerprint_uniqueness(&mine).has_code("label-conflict"));
}

#[test]
fn label_may_not_equal_description() {
    let mut e = Entity::item(q(1)).unwrap();
    e.fingerprint.labels.set_text("en", "same");
    e.fingerprint.descriptions.set_text("en", "same");
    assert!(validators()
        .validate_fingerprint_uniqueness(&e)
        .has_code("label-equals-description"));
}

// ── Limits ───────────────────────────────────────────────────────

#[test]
fn limits_fill_missing_fields_with_defaults() {
    let limits: ValidationLimits =
        serde_json::from_str(r#"{"max_term_length": 40, "languages": ["en"]}"#).unwrap();
    assert_eq!(limits.max_term_length, 40);
    assert_eq!(limits.languages, vec!["en".to_string()]);
    assert_eq!(limits.max_page_name_length, 255);
    assert_eq!(limits.site_id_pattern, ValidationLimits::default().site_id_pattern);
}
