//! Entity, property and revision identifiers.
//!
//! Entity ids are a type tag plus a positive number and serialize to their
//! canonical prefixed form (`Q42`, `P31`).

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Item,
    Property,
}

impl EntityType {
    /// Returns the single-letter prefix used in serialized ids.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Item => 'Q',
            Self::Property => 'P',
        }
    }

    /// Returns the lowercase type name (`item`, `property`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Property => "property",
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'Q' => Some(Self::Item),
            'P' => Some(Self::Property),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier of an entity.
///
/// Equality and ordering are by (type, number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    entity_type: EntityType,
    number: u64,
}

impl EntityId {
    /// Creates an entity id. Numbers start at 1.
    pub fn new(entity_type: EntityType, number: u64) -> Result<Self, Error> {
        if number == 0 {
            return Err(Error::InvalidEntityId(format!("{}0", entity_type.prefix())));
        }
        Ok(Self {
            entity_type,
            number,
        })
    }

    /// Shorthand for an item id.
    pub fn item(number: u64) -> Result<Self, Error> {
        Self::new(EntityType::Item, number)
    }

    /// Shorthand for a property id.
    pub fn property(number: u64) -> Result<Self, Error> {
        Self::new(EntityType::Property, number)
    }

    /// Returns the entity type.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the numeric part.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Parses an entity id from its serialization (`Q42`, `p31`).
    pub fn parse(s: &str) -> Result<Self, Error> {
        let mut chars = s.chars();
        let entity_type = chars
            .next()
            .and_then(EntityType::from_prefix)
            .ok_or_else(|| Error::InvalidEntityId(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidEntityId(s.to_string()));
        }
        let number = digits
            .parse::<u64>()
            .map_err(|_| Error::InvalidEntityId(s.to_string()))?;
        Self::new(entity_type, number)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.entity_type.prefix(), self.number)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// Identifier of a property, the subject of every snak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(u64);

impl PropertyId {
    /// Creates a property id. Numbers start at 1.
    pub fn new(number: u64) -> Result<Self, Error> {
        if number == 0 {
            return Err(Error::InvalidPropertyId("P0".to_string()));
        }
        Ok(Self(number))
    }

    /// Returns the numeric part.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.0
    }

    /// Returns this property as a general entity id.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        EntityId {
            entity_type: EntityType::Property,
            number: self.0,
        }
    }

    /// Parses a property id (`P31`).
    pub fn parse(s: &str) -> Result<Self, Error> {
        let id = EntityId::parse(s).map_err(|_| Error::InvalidPropertyId(s.to_string()))?;
        Self::try_from(id)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for PropertyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PropertyId> for String {
    fn from(id: PropertyId) -> Self {
        id.to_string()
    }
}

impl From<PropertyId> for EntityId {
    fn from(id: PropertyId) -> Self {
        id.entity_id()
    }
}

impl TryFrom<EntityId> for PropertyId {
    type Error = Error;

    fn try_from(id: EntityId) -> Result<Self, Self::Error> {
        match id.entity_type {
            EntityType::Property => Ok(Self(id.number)),
            EntityType::Item => Err(Error::InvalidPropertyId(id.to_string())),
        }
    }
}

/// A revision number assigned by the storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(u64);

impl RevisionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The revision id that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
