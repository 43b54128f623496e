use crate::entity_diff::{EntityDiff, StatementDiff, StatementOp};
use crate::ops::{DiffOp, MapDiff};
use crate::{PatchError, PatchResult};
use tracing::trace;
use wbedit_model::{Entity, SiteLink, SiteLinkList, Statement, StatementList, TermList};

/// Replays an [`EntityDiff`] onto an entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityPatcher;

impl EntityPatcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies `diff` to the working copy `target` and returns it.
    ///
    /// Operations that no longer fit the target are skipped, not reported:
    /// a removal whose recorded value differs from the current one, an
    /// added statement whose GUID already exists, a statement change for a
    /// GUID that is gone. Only diffs the target structurally cannot hold
    /// are errors.
    pub fn patch(&self, mut target: Entity, diff: &EntityDiff) -> PatchResult<Entity> {
        if !diff.site_links.is_empty() && !target.supports_site_links() {
            return Err(PatchError::SiteLinksUnsupported(target.entity_type));
        }
        if let Some(target_id) = target.id {
            if let Some(guid) = diff.statements.keys().find(|g| g.entity_id() != target_id) {
                return Err(PatchError::ForeignGuid {
                    guid: guid.clone(),
                    target: target_id,
                });
            }
        }

        patch_terms(&mut target.fingerprint.labels, &diff.labels);
        patch_terms(&mut target.fingerprint.descriptions, &diff.descriptions);
        for (language, ops) in &diff.aliases {
            let aliases = &mut target.fingerprint.aliases;
            let texts = ops.apply(aliases.texts(language).to_vec());
            aliases.set_texts(language, texts);
        }
        patch_statements(&mut target.statements, diff);
        patch_site_links(&mut target.site_links, &diff.site_links);

        Ok(target)
    }
}

fn patch_terms(terms: &mut TermList, diff: &MapDiff<String>) {
    for (language, op) in diff.iter() {
        match op {
            DiffOp::Add(text) | DiffOp::Change { new: text, .. } => {
                terms.set_text(language, text.clone());
            }
            DiffOp::Remove(old) => {
                if terms.text(language) == Some(old.as_str()) {
                    terms.remove(language);
                }
            }
        }
    }
}

fn patch_site_links(links: &mut SiteLinkList, diff: &MapDiff<SiteLink>) {
    for (site, op) in diff.iter() {
        match op {
            DiffOp::Add(link) | DiffOp::Change { new: link, .. } => {
                links.set(link.clone());
            }
            DiffOp::Remove(old) => {
                if links.get(site) == Some(old) {
                    links.remove(site);
                }
            }
        }
    }
}

/// Removals first, then adds in ascending index order so each lands where
/// it sat in the new list, then field changes, then the recorded order.
fn patch_statements(statements: &mut StatementList, diff: &EntityDiff) {
    let mut adds = Vec::new();
    for (guid, op) in &diff.statements {
        match op {
            StatementOp::Remove(old) => {
                if statements.get_by_guid(guid).is_some_and(|current| same_content(current, old)) {
                    statements.remove_by_guid(guid);
                }
            }
            StatementOp::Add { index, statement } => adds.push((*index, guid, statement)),
            StatementOp::Change(_) => {}
        }
    }
    adds.sort_by_key(|(index, ..)| *index);
    for (index, guid, statement) in adds {
        let mut statement = statement.clone();
        statement.guid = Some(guid.clone());
        if statements.insert(index, statement).is_err() {
            trace!("statement {guid} already present, add skipped");
        }
    }

    for (guid, op) in &diff.statements {
        if let StatementOp::Change(sub) = op {
            match statements.get_by_guid_mut(guid) {
                Some(statement) => patch_statement_fields(statement, sub),
                None => trace!("statement {guid} gone, change skipped"),
            }
        }
    }
    if let Some(order) = &diff.statement_order {
        statements.reorder(order);
    }
}

fn patch_statement_fields(statement: &mut Statement, diff: &StatementDiff) {
    if let Some(DiffOp::Add(snak) | DiffOp::Change { new: snak, .. }) = &diff.main_snak {
        statement.main_snak = snak.clone();
    }
    if let Some(DiffOp::Add(rank) | DiffOp::Change { new: rank, .. }) = &diff.rank {
        statement.rank = *rank;
    }
    if !diff.qualifiers.is_empty() {
        let qualifiers = std::mem::take(&mut statement.qualifiers).into_vec();
        statement.qualifiers = diff.qualifiers.apply(qualifiers).into();
    }
    if !diff.references.is_empty() {
        let references = std::mem::take(&mut statement.references).into_vec();
        statement.references = diff.references.apply(references).into_iter().collect();
    }
}

/// Compares statements ignoring the GUID, which a removal keys by anyway.
fn same_content(a: &Statement, b: &Statement) -> bool {
    a.main_snak == b.main_snak
        && a.qualifiers == b.qualifiers
        && a.references == b.references
        && a.rank == b.rank
}
