use crate::ops::{DiffOp, ListDiff, MapDiff};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wbedit_model::{Rank, Reference, SiteLink, Snak, Statement, StatementGuid};

/// Changes to one statement that exists on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_snak: Option<DiffOp<Snak>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<DiffOp<Rank>>,
    #[serde(default)]
    pub qualifiers: ListDiff<Snak>,
    #[serde(default)]
    pub references: ListDiff<Reference>,
}

impl StatementDiff {
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.main_snak.is_some())
            + usize::from(self.rank.is_some())
            + self.qualifiers.count()
            + self.references.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// What happened to a statement, keyed by its GUID in [`EntityDiff`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementOp {
    /// A new statement at `index` of the new statement list.
    Add { index: usize, statement: Statement },
    Remove(Statement),
    Change(StatementDiff),
}

impl StatementOp {
    /// Adding or removing a whole statement is one operation; a change
    /// counts its own leaves.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Add { .. } | Self::Remove(_) => 1,
            Self::Change(diff) => diff.count(),
        }
    }
}

/// The structural delta between two snapshots of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDiff {
    #[serde(default)]
    pub labels: MapDiff<String>,
    #[serde(default)]
    pub descriptions: MapDiff<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, ListDiff<String>>,
    #[serde(default)]
    pub statements: BTreeMap<StatementGuid, StatementOp>,
    /// The new statement order, when adds and removals alone do not
    /// produce it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_order: Option<Vec<StatementGuid>>,
    #[serde(default)]
    pub site_links: MapDiff<SiteLink>,
}

impl EntityDiff {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaf operations. Used as a size metric only.
    #[must_use]
    pub fn count(&self) -> usize {
        self.labels.len()
            + self.descriptions.len()
            + self.aliases.values().map(ListDiff::count).sum::<usize>()
            + self.statements.values().map(StatementOp::count).sum::<usize>()
            + usize::from(self.statement_order.is_some())
            + self.site_links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
