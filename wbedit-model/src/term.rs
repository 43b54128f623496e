//! Labels, descriptions and aliases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A text in a given language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub language: String,
    pub text: String,
}

impl Term {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// At most one term per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermList(BTreeMap<String, Term>);

impl TermList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the term for its language, returning the replaced term if any.
    pub fn set(&mut self, term: Term) -> Option<Term> {
        self.0.insert(term.language.clone(), term)
    }

    /// Shorthand for `set(Term::new(language, text))`.
    pub fn set_text(&mut self, language: impl Into<String>, text: impl Into<String>) -> Option<Term> {
        self.set(Term::new(language, text))
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&Term> {
        self.0.get(language)
    }

    /// Returns the text for a language.
    #[must_use]
    pub fn text(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(|t| t.text.as_str())
    }

    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.0.contains_key(language)
    }

    pub fn remove(&mut self, language: &str) -> Option<Term> {
        self.0.remove(language)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.0.values()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
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

impl FromIterator<Term> for TermList {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut list = Self::new();
        for term in iter {
            list.set(term);
        }
        list
    }
}

/// The aliases of one language: an ordered list of distinct texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    pub language: String,
    texts: Vec<String>,
}

impl AliasGroup {
    /// Creates a group, dropping duplicate and empty texts while keeping the
    /// first occurrence order.
    pub fn new(language: impl Into<String>, texts: impl IntoIterator<Item = String>) -> Self {
        let mut group = Self {
            language: language.into(),
            texts: Vec::new(),
        };
        group.add(texts);
        group
    }

    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }

    /// Appends texts not already present.
    pub fn add(&mut self, texts: impl IntoIterator<Item = String>) {
        for text in texts {
            if !text.is_empty() && !self.contains(&text) {
                self.texts.push(text);
            }
        }
    }

    /// Removes the given texts; absent texts are ignored.
    pub fn remove(&mut self, texts: &[String]) {
        self.texts.retain(|t| !texts.contains(t));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Alias groups keyed by language. Empty groups are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasGroupList(BTreeMap<String, AliasGroup>);

impl AliasGroupList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&AliasGroup> {
        self.0.get(language)
    }

    /// Returns the aliases of a language, empty if there are none.
    #[must_use]
    pub fn texts(&self, language: &str) -> &[String] {
        self.0.get(language).map(AliasGroup::texts).unwrap_or(&[])
    }

    /// Replaces the aliases of a language.
    pub fn set(&mut self, group: AliasGroup) {
        if group.is_empty() {
            self.0.remove(&group.language);
        } else {
            self.0.insert(group.language.clone(), group);
        }
    }

    /// Replaces the aliases of a language from plain texts.
    pub fn set_texts(&mut self, language: &str, texts: impl IntoIterator<Item = String>) {
        self.set(AliasGroup::new(language, texts));
    }

    /// Appends aliases to a language, skipping ones already present.
    pub fn add_texts(&mut self, language: &str, texts: impl IntoIterator<Item = String>) {
        let mut group = self
            .0
            .remove(language)
            .unwrap_or_else(|| AliasGroup::new(language, Vec::new()));
        group.add(texts);
        self.set(group);
    }

    /// Removes aliases from a language, dropping the group once empty.
    pub fn remove_texts(&mut self, language: &str, texts: &[String]) {
        if let Some(mut group) = self.0.remove(language) {
            group.remove(texts);
            self.set(group);
        }
    }

    pub fn remove_language(&mut self, language: &str) -> Option<AliasGroup> {
        self.0.remove(language)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasGroup> {
        self.0.values()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
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

/// Labels, descriptions and aliases of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub labels: TermList,
    pub descriptions: TermList,
    pub aliases: AliasGroupList,
}

impl Fingerprint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.descriptions.is_empty() && self.aliases.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.descriptions.clear();
        self.aliases.clear();
    }
}
