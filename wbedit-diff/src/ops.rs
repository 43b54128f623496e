//! Leaf diff operations and their map and list containers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single change to one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp<T> {
    Add(T),
    Remove(T),
    Change { old: T, new: T },
}

impl<T> DiffOp<T> {
    /// The value before the change, if there was one.
    pub fn old_value(&self) -> Option<&T> {
        match self {
            Self::Add(_) => None,
            Self::Remove(old) | Self::Change { old, .. } => Some(old),
        }
    }

    /// The value after the change, if there is one.
    pub fn new_value(&self) -> Option<&T> {
        match self {
            Self::Remove(_) => None,
            Self::Add(new) | Self::Change { new, .. } => Some(new),
        }
    }
}

impl<T: PartialEq + Clone> DiffOp<T> {
    /// The operation turning `old` into `new`, or `None` if nothing changed.
    pub fn between(old: Option<&T>, new: Option<&T>) -> Option<Self> {
        match (old, new) {
            (None, None) => None,
            (None, Some(new)) => Some(Self::Add(new.clone())),
            (Some(old), None) => Some(Self::Remove(old.clone())),
            (Some(old), Some(new)) if old == new => None,
            (Some(old), Some(new)) => Some(Self::Change {
                old: old.clone(),
                new: new.clone(),
            }),
        }
    }
}

/// Operations on a map keyed by language or site id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapDiff<T>(BTreeMap<String, DiffOp<T>>);

impl<T> Default for MapDiff<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> MapDiff<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, op: DiffOp<T>) {
        self.0.insert(key.into(), op);
    }

    pub fn get(&self, key: &str) -> Option<&DiffOp<T>> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffOp<T>)> {
        self.0.iter().map(|(k, op)| (k.as_str(), op))
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

impl<T: PartialEq + Clone> MapDiff<T> {
    /// Diffs two keyed collections.
    pub fn between<'a>(
        old: impl IntoIterator<Item = (&'a str, &'a T)>,
        new: impl IntoIterator<Item = (&'a str, &'a T)>,
    ) -> Self
    where
        T: 'a,
    {
        let old: BTreeMap<&str, &T> = old.into_iter().collect();
        let new: BTreeMap<&str, &T> = new.into_iter().collect();

        let mut diff = Self::new();
        for key in old.keys().chain(new.keys()) {
            if diff.0.contains_key(*key) {
                continue;
            }
            if let Some(op) = DiffOp::between(old.get(key).copied(), new.get(key).copied()) {
                diff.insert(*key, op);
            }
        }
        diff
    }
}

impl<T> FromIterator<(String, DiffOp<T>)> for MapDiff<T> {
    fn from_iter<I: IntoIterator<Item = (String, DiffOp<T>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A value inserted into a list, with its position in the new list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInsert<T> {
    pub index: usize,
    pub value: T,
}

/// Changes to an ordered list of distinct values.
///
/// Removals go by value. Insertions carry the index the value has in the
/// new list. When removing and inserting alone would not reproduce the new
/// order, `order` holds the whole new list and counts as one more
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListDiff<T> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<ListInsert<T>>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<T>>,
}

impl<T> Default for ListDiff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            order: None,
        }
    }
}

impl<T> ListDiff<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaf operations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.added.len() + self.removed.len() + usize::from(self.order.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The inserted values, in insertion order.
    pub fn added_values(&self) -> impl Iterator<Item = &T> {
        self.added.iter().map(|insert| &insert.value)
    }
}

impl<T: PartialEq + Clone> ListDiff<T> {
    /// Each value of `new` is matched with an equal, not yet matched value of
    /// `old`. Unmatched values of `new` are insertions, unmatched values of
    /// `old` are removals.
    pub fn between<'a>(
        old: impl IntoIterator<Item = &'a T>,
        new: impl IntoIterator<Item = &'a T>,
    ) -> Self
    where
        T: 'a,
    {
        let old: Vec<&T> = old.into_iter().collect();
        let new: Vec<&T> = new.into_iter().collect();

        let mut unmatched: Vec<Option<&T>> = old.iter().copied().map(Some).collect();
        let mut added = Vec::new();
        for (index, value) in new.iter().copied().enumerate() {
            match unmatched.iter().position(|slot| *slot == Some(value)) {
                Some(slot) => unmatched[slot] = None,
                None => added.push(ListInsert {
                    index,
                    value: value.clone(),
                }),
            }
        }

        let mut diff = Self {
            added,
            removed: unmatched.into_iter().flatten().cloned().collect(),
            order: None,
        };
        let replayed = diff.apply(old.into_iter().cloned().collect());
        if !replayed.iter().eq(new.iter().copied()) {
            diff.order = Some(new.into_iter().cloned().collect());
        }
        diff
    }

    /// Replays the diff onto `list`.
    ///
    /// Removals of absent values and insertions of values already present
    /// are skipped. Insert indices are clamped to the end of the list.
    /// `order` rearranges the values it names within the positions they
    /// occupy; values it does not name stay put.
    pub fn apply(&self, mut list: Vec<T>) -> Vec<T> {
        for value in &self.removed {
            if let Some(index) = list.iter().position(|v| v == value) {
                list.remove(index);
            }
        }
        for insert in &self.added {
            if !list.contains(&insert.value) {
                let index = insert.index.min(list.len());
                list.insert(index, insert.value.clone());
            }
        }
        if let Some(order) = &self.order {
            reorder(&mut list, order);
        }
        list
    }
}

fn reorder<T: PartialEq + Clone>(list: &mut [T], order: &[T]) {
    let slots: Vec<(usize, usize)> = list
        .iter()
        .enumerate()
        .filter_map(|(slot, value)| order.iter().position(|v| v == value).map(|rank| (slot, rank)))
        .collect();
    let mut ranks: Vec<usize> = slots.iter().map(|&(_, rank)| rank).collect();
    ranks.sort_unstable();
    for (&(slot, _), rank) in slots.iter().zip(ranks) {
        list[slot] = order[rank].clone();
    }
}
