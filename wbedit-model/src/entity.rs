use crate::sitelink::SiteLinkList;
use crate::statement::StatementList;
use crate::term::Fingerprint;
use crate::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use wbedit_types::{EntityId, EntityType, RevisionId};

/// An item or property snapshot.
///
/// The id is `None` until the entity is first persisted. Only items carry
/// site links; for properties `site_links` stays empty and the change-op and
/// patch layers refuse to touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Option<EntityId>,
    pub entity_type: EntityType,
    #[serde(default)]
    pub fingerprint: Fingerprint,
    #[serde(default)]
    pub statements: StatementList,
    #[serde(default, skip_serializing_if = "SiteLinkList::is_empty")]
    pub site_links: SiteLinkList,
    /// Data type of a property (`string`, `wikibase-item`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl Entity {
    /// A new, not yet persisted item.
    #[must_use]
    pub fn new_item() -> Self {
        Self::empty(None, EntityType::Item, None)
    }

    /// An empty item with the given id.
    pub fn item(id: EntityId) -> ModelResult<Self> {
        let mut entity = Self::new_item();
        entity.set_id(id)?;
        Ok(entity)
    }

    /// An empty property with the given id and data type.
    pub fn property(id: EntityId, data_type: impl Into<String>) -> ModelResult<Self> {
        let mut entity = Self::empty(None, EntityType::Property, Some(data_type.into()));
        entity.set_id(id)?;
        Ok(entity)
    }

    fn empty(id: Option<EntityId>, entity_type: EntityType, data_type: Option<String>) -> Self {
        Self {
            id,
            entity_type,
            fingerprint: Fingerprint::new(),
            statements: StatementList::new(),
            site_links: SiteLinkList::new(),
            data_type,
        }
    }

    /// Assigns the id of a new entity. The id type must match and an id
    /// that is already set is never replaced.
    pub fn set_id(&mut self, id: EntityId) -> ModelResult<()> {
        if id.entity_type() != self.entity_type {
            return Err(ModelError::IdTypeMismatch {
                id,
                expected: self.entity_type,
            });
        }
        match self.id {
            Some(existing) if existing != id => Err(ModelError::IdAlreadySet(existing)),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    /// Whether this entity type can hold site links.
    #[must_use]
    pub fn supports_site_links(&self) -> bool {
        self.entity_type == EntityType::Item
    }

    /// Whether the entity holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprint.is_empty() && self.statements.is_empty() && self.site_links.is_empty()
    }

    /// Removes all content, keeping id, type and data type.
    pub fn clear(&mut self) {
        self.fingerprint.clear();
        self.statements.clear();
        self.site_links.clear();
    }

    /// Label text for a language.
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&str> {
        self.fingerprint.labels.text(language)
    }

    /// Description text for a language.
    #[must_use]
    pub fn description(&self, language: &str) -> Option<&str> {
        self.fingerprint.descriptions.text(language)
    }
}

/// An entity as stored at a given revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRevision {
    pub entity: Entity,
    pub revision_id: RevisionId,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Name of the actor who saved this revision.
    pub author: String,
}

/// A post-merge entity state pointing at another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRedirect {
    pub source: EntityId,
    pub target: EntityId,
}
