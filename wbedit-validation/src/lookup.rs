//! Read-only lookups consulted by validators.
//!
//! These are the only collaborators a validator may call, and the only
//! place validation is allowed to perform I/O.

use std::collections::HashMap;
use wbedit_model::{Entity, EntityId, EntityType, PropertyId, TermList};

/// Resolves the data type of a property.
pub trait PropertyDataTypeLookup: Send + Sync {
    /// Returns `None` if the property does not exist.
    fn data_type(&self, property: PropertyId) -> Option<String>;
}

/// A fixed map of property data types.
#[derive(Debug, Clone, Default)]
pub struct PropertyDataTypes(HashMap<PropertyId, String>);

impl PropertyDataTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, property: PropertyId, data_type: impl Into<String>) -> Self {
        self.0.insert(property, data_type.into());
        self
    }
}

impl PropertyDataTypeLookup for PropertyDataTypes {
    fn data_type(&self, property: PropertyId) -> Option<String> {
        self.0.get(&property).cloned()
    }
}

/// A term already used by another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermConflict {
    pub language: String,
    pub text: String,
    pub entity_id: EntityId,
}

/// Finds entities that already use a label, or a label/description pair.
pub trait LabelDescriptionDuplicateDetector: Send + Sync {
    /// Entities of `entity_type` (other than `ignore`) with one of these labels.
    fn label_conflicts(
        &self,
        entity_type: EntityType,
        labels: &TermList,
        ignore: Option<EntityId>,
    ) -> Vec<TermConflict>;

    /// Entities of `entity_type` (other than `ignore`) with the same label
    /// and description in one language.
    fn label_description_conflicts(
        &self,
        entity_type: EntityType,
        labels: &TermList,
        descriptions: &TermList,
        ignore: Option<EntityId>,
    ) -> Vec<TermConflict>;
}

/// Finds the item already linked to a page.
pub trait SiteLinkConflictLookup: Send + Sync {
    fn linked_item(&self, site_id: &str, page_name: &str) -> Option<EntityId>;
}

struct IndexedTerms {
    id: EntityId,
    labels: TermList,
    descriptions: TermList,
}

/// A snapshot index over a set of entities, for tests and embedders that
/// keep everything in memory.
#[derive(Default)]
pub struct InMemoryTermIndex {
    terms: Vec<IndexedTerms>,
    site_links: HashMap<(String, String), EntityId>,
}

impl InMemoryTermIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the terms and site links of persisted entities; entities
    /// without an id are skipped.
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::new();
        for entity in entities {
            index.insert(entity);
        }
        index
    }

    pub fn insert(&mut self, entity: &Entity) {
        let Some(id) = entity.id else {
            return;
        };
        self.terms.retain(|t| t.id != id);
        self.site_links.retain(|_, linked| *linked != id);
        self.terms.push(IndexedTerms {
            id,
            labels: entity.fingerprint.labels.clone(),
            descriptions: entity.fingerprint.descriptions.clone(),
        });
        for link in entity.site_links.iter() {
            self.site_links
                .insert((link.site_id.clone(), link.page_name.clone()), id);
        }
    }

    fn candidates(
        &self,
        entity_type: EntityType,
        ignore: Option<EntityId>,
    ) -> impl Iterator<Item = &IndexedTerms> {
        self.terms
            .iter()
            .filter(move |t| t.id.entity_type() == entity_type && Some(t.id) != ignore)
    }
}

impl LabelDescriptionDuplicateDetector for InMemoryTermIndex {
    fn label_conflicts(
        &self,
        entity_type: EntityType,
        labels: &TermList,
        ignore: Option<EntityId>,
    ) -> Vec<TermConflict> {
        let mut conflicts = Vec::new();
        for indexed in self.candidates(entity_type, ignore) {
            for label in labels.iter() {
                if indexed.labels.text(&label.language) == Some(label.text.as_str()) {
                    conflicts.push(TermConflict {
                        language: label.language.clone(),
                        text: label.text.clone(),
                        entity_id: indexed.id,
                    });
                }
            }
        }
        conflicts
    }

    fn label_description_conflicts(
        &self,
        entity_type: EntityType,
        labels: &TermList,
        descriptions: &TermList,
        ignore: Option<EntityId>,
    ) -> Vec<TermConflict> {
        let mut conflicts = Vec::new();
        for indexed in self.candidates(entity_type, ignore) {
            for label in labels.iter() {
                let Some(description) = descriptions.text(&label.language) else {
                    continue;
                };
                let same_label = indexed.labels.text(&label.language) == Some(label.text.as_str());
                let same_description = indexed.descriptions.text(&label.language) == Some(description);
                if same_label && same_description {
                    conflicts.push(TermConflict {
                        language: label.language.clone(),
                        text: label.text.clone(),
                        entity_id: indexed.id,
                    });
                }
            }
        }
        conflicts
    }
}

impl SiteLinkConflictLookup for InMemoryTermIndex {
    fn linked_item(&self, site_id: &str, page_name: &str) -> Option<EntityId> {
        self.site_links
            .get(&(site_id.to_string(), page_name.to_string()))
            .copied()
    }
}
