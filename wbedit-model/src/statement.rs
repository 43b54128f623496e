//! Statements, their references and ranks.

use crate::hash::content_hash;
use crate::snak::{DataValue, Snak, SnakList};
use crate::{ModelError, ModelResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use wbedit_types::{EntityId, PropertyId, StatementGuid};

/// Rank of a statement. Only used elsewhere to pick "best" statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Deprecated,
    #[default]
    Normal,
    Preferred,
}

impl Rank {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deprecated => "deprecated",
            Self::Normal => "normal",
            Self::Preferred => "preferred",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of snaks supporting a statement.
///
/// A reference is a set of snaks, kept grouped by property. It has no
/// identity of its own: two references with the same snaks, in whatever
/// order, are the same reference and share a [`Reference::hash`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ReferenceSnaks")]
pub struct Reference {
    pub snaks: SnakList,
}

#[derive(Deserialize)]
struct ReferenceSnaks {
    #[serde(default)]
    snaks: SnakList,
}

impl From<ReferenceSnaks> for Reference {
    fn from(raw: ReferenceSnaks) -> Self {
        Self::new(raw.snaks)
    }
}

impl Reference {
    pub fn new(snaks: impl Into<SnakList>) -> Self {
        let mut snaks = snaks.into();
        snaks.order_by_property();
        Self { snaks }
    }

    /// Content hash over the snaks, independent of their order.
    #[must_use]
    pub fn hash(&self) -> String {
        let parts = self.sorted_parts();
        content_hash(parts.iter().map(String::as_str))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snaks.is_empty()
    }

    fn sorted_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self.snaks.iter().map(Snak::canonical).collect();
        parts.sort_unstable();
        parts
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.snaks.len() == other.snaks.len() && self.sorted_parts() == other.sorted_parts()
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_parts().hash(state);
    }
}

/// Ordered references of a statement, each content present at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceList(Vec<Reference>);

impl ReferenceList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Reference> {
        self.0.get(index)
    }

    #[must_use]
    pub fn index_of_hash(&self, hash: &str) -> Option<usize> {
        self.0.iter().position(|r| r.hash() == hash)
    }

    #[must_use]
    pub fn has_hash(&self, hash: &str) -> bool {
        self.index_of_hash(hash).is_some()
    }

    /// Whether a reference with the same content is present.
    #[must_use]
    pub fn contains(&self, reference: &Reference) -> bool {
        self.0.contains(reference)
    }

    /// Appends a reference unless equal content is present. Returns whether
    /// it was added.
    pub fn push(&mut self, reference: Reference) -> bool {
        let len = self.0.len();
        self.insert(len, reference)
    }

    /// Inserts at `index`, clamped to the end of the list, unless equal
    /// content is present. Returns whether it was added.
    pub fn insert(&mut self, index: usize, reference: Reference) -> bool {
        if self.contains(&reference) {
            return false;
        }
        let index = index.min(self.0.len());
        self.0.insert(index, reference);
        true
    }

    pub fn remove_by_hash(&mut self, hash: &str) -> Option<Reference> {
        self.index_of_hash(hash).map(|index| self.0.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Reference> {
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

impl FromIterator<Reference> for ReferenceList {
    fn from_iter<I: IntoIterator<Item = Reference>>(iter: I) -> Self {
        let mut list = Self::new();
        for reference in iter {
            list.push(reference);
        }
        list
    }
}

impl<'de> Deserialize<'de> for ReferenceList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Reference>::deserialize(deserializer).map(|references| references.into_iter().collect())
    }
}

/// A main snak plus qualifiers, references and rank, identified by GUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub guid: Option<StatementGuid>,
    pub main_snak: Snak,
    #[serde(default)]
    pub qualifiers: SnakList,
    #[serde(default)]
    pub references: ReferenceList,
    #[serde(default)]
    pub rank: Rank,
}

impl Statement {
    /// A normal-rank statement without qualifiers or references.
    #[must_use]
    pub fn new(main_snak: Snak) -> Self {
        Self {
            guid: None,
            main_snak,
            qualifiers: SnakList::new(),
            references: ReferenceList::new(),
            rank: Rank::Normal,
        }
    }

    #[must_use]
    pub fn with_guid(mut self, guid: StatementGuid) -> Self {
        self.guid = Some(guid);
        self
    }

    #[must_use]
    pub fn property_id(&self) -> PropertyId {
        self.main_snak.property_id()
    }

    /// Entity ids this statement points at through its main snak or qualifiers.
    pub fn referenced_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::once(&self.main_snak)
            .chain(self.qualifiers.iter())
            .filter_map(|snak| match snak.data_value() {
                Some(DataValue::EntityId(id)) => Some(*id),
                _ => None,
            })
    }
}

/// Ordered statements of an entity. GUIDs are unique within the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementList(Vec<Statement>);

impl StatementList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_by_guid(&self, guid: &StatementGuid) -> Option<&Statement> {
        self.0.iter().find(|s| s.guid.as_ref() == Some(guid))
    }

    pub fn get_by_guid_mut(&mut self, guid: &StatementGuid) -> Option<&mut Statement> {
        self.0.iter_mut().find(|s| s.guid.as_ref() == Some(guid))
    }

    #[must_use]
    pub fn index_of_guid(&self, guid: &StatementGuid) -> Option<usize> {
        self.0.iter().position(|s| s.guid.as_ref() == Some(guid))
    }

    /// Appends a statement. Fails if its GUID is already present.
    pub fn push(&mut self, statement: Statement) -> ModelResult<()> {
        let len = self.0.len();
        self.insert(len, statement)
    }

    /// Inserts a statement at `index` (clamped). Fails if its GUID is already present.
    pub fn insert(&mut self, index: usize, statement: Statement) -> ModelResult<()> {
        if let Some(guid) = &statement.guid {
            if self.index_of_guid(guid).is_some() {
                return Err(ModelError::DuplicateGuid(guid.clone()));
            }
        }
        let index = index.min(self.0.len());
        self.0.insert(index, statement);
        Ok(())
    }

    pub fn remove_by_guid(&mut self, guid: &StatementGuid) -> Option<Statement> {
        self.index_of_guid(guid).map(|index| self.0.remove(index))
    }

    /// Rearranges the statements whose GUIDs appear in `order` into that
    /// order, within the positions they already occupy. Other statements
    /// stay where they are.
    pub fn reorder(&mut self, order: &[StatementGuid]) {
        let slots: Vec<(usize, usize)> = self
            .0
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| {
                let guid = s.guid.as_ref()?;
                order.iter().position(|g| g == guid).map(|rank| (slot, rank))
            })
            .collect();
        let mut moved: Vec<(usize, Statement)> = slots
            .iter()
            .map(|&(slot, rank)| (rank, self.0[slot].clone()))
            .collect();
        moved.sort_by_key(|(rank, _)| *rank);
        for ((slot, _), (_, statement)) in slots.into_iter().zip(moved) {
            self.0[slot] = statement;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a StatementList {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
