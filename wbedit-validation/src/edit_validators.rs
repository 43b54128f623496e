use crate::lookup::{LabelDescriptionDuplicateDetector, PropertyDataTypeLookup, SiteLinkConflictLookup};
use crate::validators::{
    LengthValidator, MembershipValidator, NotEntityIdValidator, PatternValidator, SnakValidator,
    WhitespaceValidator,
};
use crate::{
    CompositeValidator, ConfigResult, ValidationError, ValidationLimits, ValidationMode,
    ValidationResult, ValueValidator,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use wbedit_model::{Entity, EntityId, EntityType, SiteLink, Snak, Statement};

/// The validators used by change ops, assembled once from limits and lookups.
pub struct EditValidators {
    language: CompositeValidator<str>,
    item_label: CompositeValidator<str>,
    property_label: CompositeValidator<str>,
    description: CompositeValidator<str>,
    alias: CompositeValidator<str>,
    site_id: CompositeValidator<str>,
    page_name: CompositeValidator<str>,
    badges: Option<BTreeSet<EntityId>>,
    snak: SnakValidator,
    duplicates: Option<Arc<dyn LabelDescriptionDuplicateDetector>>,
    site_link_conflicts: Option<Arc<dyn SiteLinkConflictLookup>>,
}

impl EditValidators {
    /// Builds the validator bundle. Fails if a configured pattern or badge
    /// id does not parse.
    pub fn new(
        limits: &ValidationLimits,
        data_types: Arc<dyn PropertyDataTypeLookup>,
    ) -> ConfigResult<Self> {
        let mut language = CompositeValidator::new(ValidationMode::FailFast)
            .with(PatternValidator::new(&limits.language_pattern)?);
        if !limits.languages.is_empty() {
            language.push(Box::new(MembershipValidator::new(
                limits.languages.iter().cloned(),
                "unknown-language",
            )));
        }

        let mut site_id = CompositeValidator::new(ValidationMode::FailFast)
            .with(PatternValidator::new(&limits.site_id_pattern)?);
        if !limits.sites.is_empty() {
            site_id.push(Box::new(MembershipValidator::new(
                limits.sites.iter().cloned(),
                "unknown-site",
            )));
        }

        let term = |max: usize| {
            CompositeValidator::new(ValidationMode::FailFast)
                .with(LengthValidator::new(1, max))
                .with(WhitespaceValidator)
        };

        let badges = if limits.badges.is_empty() {
            None
        } else {
            Some(
                limits
                    .badges
                    .iter()
                    .map(|b| EntityId::parse(b))
                    .collect::<Result<BTreeSet<_>, _>>()?,
            )
        };

        Ok(Self {
            language,
            item_label: term(limits.max_term_length),
            property_label: term(limits.max_term_length)
                .with(NotEntityIdValidator::new(EntityType::Property)),
            description: term(limits.max_term_length),
            alias: term(limits.max_term_length),
            site_id,
            page_name: term(limits.max_page_name_length),
            badges,
            snak: SnakValidator::new(data_types),
            duplicates: None,
            site_link_conflicts: None,
        })
    }

    /// Enables label/description uniqueness checks.
    #[must_use]
    pub fn with_duplicate_detector(
        mut self,
        detector: Arc<dyn LabelDescriptionDuplicateDetector>,
    ) -> Self {
        self.duplicates = Some(detector);
        self
    }

    /// Enables site-link uniqueness checks.
    #[must_use]
    pub fn with_site_link_conflicts(mut self, lookup: Arc<dyn SiteLinkConflictLookup>) -> Self {
        self.site_link_conflicts = Some(lookup);
        self
    }

    pub fn validate_language(&self, language: &str) -> ValidationResult {
        self.language.validate(language)
    }

    pub fn validate_label(&self, entity_type: EntityType, text: &str) -> ValidationResult {
        match entity_type {
            EntityType::Item => self.item_label.validate(text),
            EntityType::Property => self.property_label.validate(text),
        }
    }

    pub fn validate_description(&self, text: &str) -> ValidationResult {
        self.description.validate(text)
    }

    pub fn validate_alias(&self, text: &str) -> ValidationResult {
        self.alias.validate(text)
    }

    pub fn validate_site_id(&self, site_id: &str) -> ValidationResult {
        self.site_id.validate(site_id)
    }

    pub fn validate_page_name(&self, page_name: &str) -> ValidationResult {
        self.page_name.validate(page_name)
    }

    /// Badges must be items, and in the configured badge set if there is one.
    pub fn validate_badges<'a>(&self, badges: impl IntoIterator<Item = &'a EntityId>) -> ValidationResult {
        badges
            .into_iter()
            .filter(|badge| {
                badge.entity_type() != EntityType::Item
                    || self.badges.as_ref().is_some_and(|allowed| !allowed.contains(*badge))
            })
            .map(|badge| ValidationError::new("not-a-badge").with("value", badge))
            .collect()
    }

    pub fn validate_snak(&self, snak: &Snak) -> ValidationResult {
        self.snak.validate(snak)
    }

    /// Validates every snak of a statement: main snak, qualifiers and
    /// reference snaks.
    pub fn validate_statement(&self, statement: &Statement) -> ValidationResult {
        let reference_snaks = statement.references.iter().flat_map(|r| r.snaks.iter());
        std::iter::once(&statement.main_snak)
            .chain(statement.qualifiers.iter())
            .chain(reference_snaks)
            .fold(ValidationResult::valid(), |acc, snak| {
                acc.merged(self.validate_snak(snak))
            })
    }

    /// Checks label/description constraints of a whole entity: a label may
    /// not equal the description in the same language, and the terms must
    /// be unique among entities of the same type.
    pub fn validate_fingerprint_uniqueness(&self, entity: &Entity) -> ValidationResult {
        let labels = &entity.fingerprint.labels;
        let descriptions = &entity.fingerprint.descriptions;

        let mut result: ValidationResult = labels
            .iter()
            .filter(|label| descriptions.text(&label.language) == Some(label.text.as_str()))
            .map(|label| {
                ValidationError::new("label-equals-description").with("language", &label.language)
            })
            .collect();

        let Some(detector) = &self.duplicates else {
            return result;
        };
        let (code, conflicts) = match entity.entity_type {
            EntityType::Property => (
                "label-conflict",
                detector.label_conflicts(entity.entity_type, labels, entity.id),
            ),
            EntityType::Item => (
                "label-with-description-conflict",
                detector.label_description_conflicts(entity.entity_type, labels, descriptions, entity.id),
            ),
        };
        for conflict in conflicts {
            debug!(
                "term conflict in {} on {:?} with {}",
                conflict.language, conflict.text, conflict.entity_id
            );
            result.merge(ValidationResult::invalid(
                ValidationError::new(code)
                    .with("language", &conflict.language)
                    .with("text", &conflict.text)
                    .with("entity", conflict.entity_id),
            ));
        }
        result
    }

    /// Checks that no other item already links to the same page.
    pub fn validate_site_link_uniqueness(
        &self,
        owner: Option<EntityId>,
        link: &SiteLink,
    ) -> ValidationResult {
        let Some(lookup) = &self.site_link_conflicts else {
            return ValidationResult::valid();
        };
        match lookup.linked_item(&link.site_id, &link.page_name) {
            Some(other) if Some(other) != owner => {
                debug!("site link {}:{} already used by {}", link.site_id, link.page_name, other);
                ValidationResult::invalid(
                    ValidationError::new("sitelink-conflict")
                        .with("site", &link.site_id)
                        .with("page", &link.page_name)
                        .with("entity", other),
                )
            }
            _ => ValidationResult::valid(),
        }
    }
}
