use crate::entity_diff::{EntityDiff, StatementDiff, StatementOp};
use crate::ops::{DiffOp, ListDiff, MapDiff};
use std::collections::BTreeMap;
use wbedit_model::{
    AliasGroupList, Entity, SiteLink, SiteLinkList, Statement, StatementGuid, StatementList,
    TermList,
};

/// Computes the structural delta between two entity snapshots.
///
/// Statements without a GUID have no identity to diff by and are ignored;
/// every statement that has been through a change op carries one.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityDiffer;

impl EntityDiffer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The diff that turns `from` into `to`.
    #[must_use]
    pub fn diff(&self, from: &Entity, to: &Entity) -> EntityDiff {
        let statements = diff_statements(&from.statements, &to.statements);
        let statement_order = statement_order(&from.statements, &to.statements, &statements);
        EntityDiff {
            labels: diff_terms(&from.fingerprint.labels, &to.fingerprint.labels),
            descriptions: diff_terms(&from.fingerprint.descriptions, &to.fingerprint.descriptions),
            aliases: diff_aliases(&from.fingerprint.aliases, &to.fingerprint.aliases),
            statements,
            statement_order,
            site_links: diff_site_links(&from.site_links, &to.site_links),
        }
    }

    /// The sub-diff of two versions of the same statement.
    #[must_use]
    pub fn diff_statement(&self, from: &Statement, to: &Statement) -> StatementDiff {
        StatementDiff {
            main_snak: DiffOp::between(Some(&from.main_snak), Some(&to.main_snak)),
            rank: DiffOp::between(Some(&from.rank), Some(&to.rank)),
            qualifiers: ListDiff::between(from.qualifiers.iter(), to.qualifiers.iter()),
            references: ListDiff::between(from.references.iter(), to.references.iter()),
        }
    }
}

fn diff_terms(from: &TermList, to: &TermList) -> MapDiff<String> {
    MapDiff::between(
        from.iter().map(|t| (t.language.as_str(), &t.text)),
        to.iter().map(|t| (t.language.as_str(), &t.text)),
    )
}

fn diff_aliases(from: &AliasGroupList, to: &AliasGroupList) -> BTreeMap<String, ListDiff<String>> {
    let mut diff = BTreeMap::new();
    for language in from.languages().chain(to.languages()) {
        if diff.contains_key(language) {
            continue;
        }
        let ops = ListDiff::between(from.texts(language), to.texts(language));
        if !ops.is_empty() {
            diff.insert(language.to_string(), ops);
        }
    }
    diff
}

fn diff_statements(from: &StatementList, to: &StatementList) -> BTreeMap<StatementGuid, StatementOp> {
    let old = by_guid(from);
    let new: BTreeMap<&StatementGuid, (usize, &Statement)> = to
        .iter()
        .enumerate()
        .filter_map(|(index, s)| s.guid.as_ref().map(|guid| (guid, (index, s))))
        .collect();

    let mut diff = BTreeMap::new();
    for (guid, statement) in &old {
        match new.get(guid) {
            None => {
                diff.insert((*guid).clone(), StatementOp::Remove((*statement).clone()));
            }
            Some((_, updated)) => {
                let sub = EntityDiffer.diff_statement(statement, updated);
                if !sub.is_empty() {
                    diff.insert((*guid).clone(), StatementOp::Change(sub));
                }
            }
        }
    }
    for (guid, (index, statement)) in new {
        if !old.contains_key(guid) {
            let statement = statement.clone();
            diff.insert(guid.clone(), StatementOp::Add { index, statement });
        }
    }
    diff
}

/// Replays the removals and positioned adds of `diff` on the GUIDs of
/// `from`; if that does not give the GUID order of `to`, the full order is
/// recorded.
fn statement_order(
    from: &StatementList,
    to: &StatementList,
    diff: &BTreeMap<StatementGuid, StatementOp>,
) -> Option<Vec<StatementGuid>> {
    let mut replayed: Vec<Option<&StatementGuid>> = from
        .iter()
        .map(|s| s.guid.as_ref())
        .filter(|guid| !matches!(guid.and_then(|g| diff.get(g)), Some(StatementOp::Remove(_))))
        .collect();
    let mut adds: Vec<(usize, &StatementGuid)> = diff
        .iter()
        .filter_map(|(guid, op)| match op {
            StatementOp::Add { index, .. } => Some((*index, guid)),
            _ => None,
        })
        .collect();
    adds.sort_unstable();
    for (index, guid) in adds {
        replayed.insert(index.min(replayed.len()), Some(guid));
    }

    let expected: Vec<&StatementGuid> = to.iter().filter_map(|s| s.guid.as_ref()).collect();
    if replayed.iter().flatten().eq(expected.iter()) {
        None
    } else {
        Some(expected.into_iter().cloned().collect())
    }
}

fn by_guid(list: &StatementList) -> BTreeMap<&StatementGuid, &Statement> {
    list.iter()
        .filter_map(|s| s.guid.as_ref().map(|guid| (guid, s)))
        .collect()
}

fn diff_site_links(from: &SiteLinkList, to: &SiteLinkList) -> MapDiff<SiteLink> {
    MapDiff::between(
        from.iter().map(|l| (l.site_id.as_str(), l)),
        to.iter().map(|l| (l.site_id.as_str(), l)),
    )
}
