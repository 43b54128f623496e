//! Site links from items to pages on other sites.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use wbedit_types::EntityId;

/// A link from an item to a page on a site, with optional badges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteLink {
    pub site_id: String,
    pub page_name: String,
    #[serde(default)]
    pub badges: BTreeSet<EntityId>,
}

impl SiteLink {
    pub fn new(site_id: impl Into<String>, page_name: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            page_name: page_name.into(),
            badges: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_badges(mut self, badges: impl IntoIterator<Item = EntityId>) -> Self {
        self.badges = badges.into_iter().collect();
        self
    }
}

/// Site links keyed by site id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteLinkList(BTreeMap<String, SiteLink>);

impl SiteLinkList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the link for its site, returning the replaced link if any.
    pub fn set(&mut self, link: SiteLink) -> Option<SiteLink> {
        self.0.insert(link.site_id.clone(), link)
    }

    #[must_use]
    pub fn get(&self, site_id: &str) -> Option<&SiteLink> {
        self.0.get(site_id)
    }

    #[must_use]
    pub fn has_site(&self, site_id: &str) -> bool {
        self.0.contains_key(site_id)
    }

    pub fn remove(&mut self, site_id: &str) -> Option<SiteLink> {
        self.0.remove(site_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteLink> {
        self.0.values()
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

impl FromIterator<SiteLink> for SiteLinkList {
    fn from_iter<I: IntoIterator<Item = SiteLink>>(iter: I) -> Self {
        let mut list = Self::new();
        for link in iter {
            list.set(link);
        }
        list
    }
}
