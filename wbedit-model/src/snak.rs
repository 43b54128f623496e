//! Snaks: single property assertions.

use crate::hash::content_hash;
use serde::{Deserialize, Deserializer, Serialize};
use wbedit_types::{EntityId, PropertyId};

/// A typed value carried by a [`Snak::Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DataValue {
    String(String),
    #[serde(rename = "wikibase-entityid")]
    EntityId(EntityId),
    MonolingualText {
        language: String,
        text: String,
    },
    Quantity {
        amount: String,
        unit: String,
    },
    Time {
        time: String,
        precision: u8,
        calendar: String,
    },
}

impl DataValue {
    /// The value type id checked against a property's data type.
    #[must_use]
    pub const fn type_id(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::EntityId(_) => "wikibase-entityid",
            Self::MonolingualText { .. } => "monolingualtext",
            Self::Quantity { .. } => "quantity",
            Self::Time { .. } => "time",
        }
    }

    fn canonical(&self) -> String {
        match self {
            Self::String(s) => format!("string:{s}"),
            Self::EntityId(id) => format!("entity:{id}"),
            Self::MonolingualText { language, text } => format!("mono:{language}:{text}"),
            Self::Quantity { amount, unit } => format!("quantity:{amount}:{unit}"),
            Self::Time {
                time,
                precision,
                calendar,
            } => format!("time:{time}:{precision}:{calendar}"),
        }
    }
}

/// A property assertion in one of three modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "snaktype", rename_all = "lowercase")]
pub enum Snak {
    NoValue {
        property: PropertyId,
    },
    SomeValue {
        property: PropertyId,
    },
    Value {
        property: PropertyId,
        datavalue: DataValue,
    },
}

impl Snak {
    #[must_use]
    pub fn no_value(property: PropertyId) -> Self {
        Self::NoValue { property }
    }

    #[must_use]
    pub fn some_value(property: PropertyId) -> Self {
        Self::SomeValue { property }
    }

    #[must_use]
    pub fn value(property: PropertyId, datavalue: DataValue) -> Self {
        Self::Value {
            property,
            datavalue,
        }
    }

    /// Shorthand for a string-valued snak.
    #[must_use]
    pub fn string(property: PropertyId, text: impl Into<String>) -> Self {
        Self::value(property, DataValue::String(text.into()))
    }

    #[must_use]
    pub fn property_id(&self) -> PropertyId {
        match self {
            Self::NoValue { property } | Self::SomeValue { property } | Self::Value { property, .. } => {
                *property
            }
        }
    }

    #[must_use]
    pub fn data_value(&self) -> Option<&DataValue> {
        match self {
            Self::Value { datavalue, .. } => Some(datavalue),
            _ => None,
        }
    }

    /// Stable representation used for content hashing.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::NoValue { property } => format!("novalue|{property}"),
            Self::SomeValue { property } => format!("somevalue|{property}"),
            Self::Value {
                property,
                datavalue,
            } => format!("value|{property}|{}", datavalue.canonical()),
        }
    }

    /// Content hash of this snak.
    #[must_use]
    pub fn hash(&self) -> String {
        content_hash([self.canonical().as_str()])
    }
}

/// An ordered list of distinct snaks, as used for qualifiers and reference
/// content. Every way of building one drops repeated snaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SnakList(Vec<Snak>);

impl SnakList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Snak> {
        self.0.get(index)
    }

    #[must_use]
    pub fn contains(&self, snak: &Snak) -> bool {
        self.0.contains(snak)
    }

    /// Position of the snak with the given content hash.
    #[must_use]
    pub fn position_of_hash(&self, hash: &str) -> Option<usize> {
        self.0.iter().position(|s| s.hash() == hash)
    }

    /// Appends a snak unless an equal one is present. Returns whether it was added.
    pub fn push(&mut self, snak: Snak) -> bool {
        if self.contains(&snak) {
            return false;
        }
        self.0.push(snak);
        true
    }

    /// Replaces the snak at `index`.
    pub fn replace(&mut self, index: usize, snak: Snak) -> Option<Snak> {
        self.0
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, snak))
    }

    /// Removes the first snak equal to `snak`.
    pub fn remove(&mut self, snak: &Snak) -> bool {
        match self.0.iter().position(|s| s == snak) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_by_hash(&mut self, hash: &str) -> Option<Snak> {
        self.position_of_hash(hash).map(|index| self.0.remove(index))
    }

    /// Regroups snaks so that snaks of the same property are adjacent,
    /// keeping the first-occurrence order of properties.
    pub fn order_by_property(&mut self) {
        let mut order: Vec<PropertyId> = Vec::new();
        for snak in &self.0 {
            if !order.contains(&snak.property_id()) {
                order.push(snak.property_id());
            }
        }
        self.0.sort_by_key(|s| order.iter().position(|p| *p == s.property_id()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snak> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Snak> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Snak> for SnakList {
    fn from_iter<I: IntoIterator<Item = Snak>>(iter: I) -> Self {
        let mut list = Self::new();
        for snak in iter {
            list.push(snak);
        }
        list
    }
}

impl From<Vec<Snak>> for SnakList {
    fn from(snaks: Vec<Snak>) -> Self {
        snaks.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for SnakList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Snak>::deserialize(deserializer).map(Self::from)
    }
}

impl<'a> IntoIterator for &'a SnakList {
    type Item = &'a Snak;
    type IntoIter = std::slice::Iter<'a, Snak>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
