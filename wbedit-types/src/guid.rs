//! Statement GUIDs.
//!
//! A statement GUID is scoped to the entity that owns the statement and is
//! rendered as `<entity id>$<key>`. Once issued it is never reused.

use crate::{EntityId, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Globally unique identifier of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatementGuid {
    entity_id: EntityId,
    key: String,
}

impl StatementGuid {
    /// Creates a GUID from its parts. The key must be non-empty and must not
    /// contain the `$` separator.
    pub fn new(entity_id: EntityId, key: impl Into<String>) -> Result<Self, Error> {
        let key = key.into();
        if key.is_empty() || key.contains('$') {
            return Err(Error::InvalidGuid(format!("{entity_id}${key}")));
        }
        Ok(Self { entity_id, key })
    }

    /// The entity this statement belongs to.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// The entity-local part of the GUID.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Parses a GUID from its serialization (`Q42$5627445f-...`).
    pub fn parse(s: &str) -> Result<Self, Error> {
        let (prefix, key) = s
            .split_once('$')
            .ok_or_else(|| Error::InvalidGuid(s.to_string()))?;
        let entity_id = EntityId::parse(prefix).map_err(|_| Error::InvalidGuid(s.to_string()))?;
        Self::new(entity_id, key)
    }
}

impl fmt::Display for StatementGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", self.entity_id, self.key)
    }
}

impl FromStr for StatementGuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StatementGuid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StatementGuid> for String {
    fn from(guid: StatementGuid) -> Self {
        guid.to_string()
    }
}

/// Mints fresh statement GUIDs.
///
/// Implementations must never return the same GUID twice for an entity.
pub trait GuidGenerator: Send + Sync {
    fn new_guid(&self, entity_id: &EntityId) -> StatementGuid;
}

/// Default generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGuidGenerator;

impl GuidGenerator for UuidGuidGenerator {
    fn new_guid(&self, entity_id: &EntityId) -> StatementGuid {
        StatementGuid {
            entity_id: *entity_id,
            key: Uuid::new_v4().hyphenated().to_string(),
        }
    }
}
