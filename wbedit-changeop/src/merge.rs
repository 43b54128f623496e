//! Folding one entity into another.

use crate::{ChangeOp, ChangeOpContext, ChangeOpError, ChangeOps, MergeError, MergeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use wbedit_model::{Entity, EntityId};

/// The field categories whose conflicts a merge may be told to ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Label,
    Description,
    #[serde(rename = "sitelink")]
    SiteLink,
}

impl ConflictKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Description => "description",
            Self::SiteLink => "sitelink",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictKind {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label" => Ok(Self::Label),
            "description" => Ok(Self::Description),
            "sitelink" => Ok(Self::SiteLink),
            other => Err(MergeError::UnknownConflictKind(other.to_string())),
        }
    }
}

/// Conflict kinds to resolve silently instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreConflicts(BTreeSet<ConflictKind>);

impl IgnoreConflicts {
    /// Ignore nothing: every conflict fails the merge.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses conflict kind names. Any unknown name rejects the whole list.
    pub fn parse<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> MergeResult<Self> {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<ConflictKind>())
            .collect::<MergeResult<BTreeSet<_>>>()
            .map(Self)
    }

    #[must_use]
    pub fn contains(&self, kind: ConflictKind) -> bool {
        self.0.contains(&kind)
    }
}

impl FromIterator<ConflictKind> for IgnoreConflicts {
    fn from_iter<I: IntoIterator<Item = ConflictKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Both sides of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntities {
    /// The source, emptied. Persist it only after `to` is saved.
    pub from: Entity,
    /// The target with the source's content folded in.
    pub to: Entity,
}

/// Merges the content of one entity into another.
///
/// - Labels are adopted where the target has none or the same text. A
///   differing label conflicts, or with `label` ignored becomes an alias.
/// - Descriptions are adopted the same way. An ignored conflict keeps the
///   target's description.
/// - Aliases are always unioned.
/// - Site links are adopted where the target has none for the site. A
///   link to a different page conflicts, or with `sitelink` ignored keeps
///   the target's link.
/// - Statements are always copied, with fresh GUIDs of the target.
///
/// The ops are validated against the target before they are applied, and
/// the merged target must keep its terms unique. Values the source holds
/// do not count as clashes, since the source is cleared.
///
/// Both inputs are left untouched; the merged pair is returned only when
/// the whole merge succeeds.
#[derive(Debug, Clone, Default)]
pub struct ChangeOpsMerge {
    ignore: IgnoreConflicts,
}

impl ChangeOpsMerge {
    #[must_use]
    pub fn new(ignore: IgnoreConflicts) -> Self {
        Self { ignore }
    }

    pub fn merge(
        &self,
        from: &Entity,
        to: &Entity,
        ctx: &ChangeOpContext,
    ) -> MergeResult<MergedEntities> {
        let (from_id, to_id) = check_preconditions(from, to)?;

        let mut ops = self.fingerprint_ops(from, to)?;
        ops.extend(self.site_link_ops(from, to)?);
        ops.extend(from.statements.iter().map(|statement| {
            let mut statement = statement.clone();
            statement.guid = None;
            ChangeOp::set_statement(statement)
        }));
        debug!("merging {from_id} into {to_id} with {} change ops", ops.len());

        // the source still holds everything it hands over until it is cleared
        let result = ops
            .ops()
            .iter()
            .map(|op| op.validate(to, ctx).ignoring_entity(from_id))
            .find(|result| !result.is_valid())
            .unwrap_or_default();
        if !result.is_valid() {
            return Err(ChangeOpError::Validation(result).into());
        }
        let merged_to = ops.apply(to.clone(), None, ctx)?;
        let result = ctx
            .validators()
            .validate_fingerprint_uniqueness(&merged_to)
            .ignoring_entity(from_id);
        if !result.is_valid() {
            debug!("merged {to_id} fails uniqueness: {result}");
            return Err(ChangeOpError::Validation(result).into());
        }
        let mut cleared_from = from.clone();
        cleared_from.clear();

        info!("merged {from_id} into {to_id}");
        Ok(MergedEntities {
            from: cleared_from,
            to: merged_to,
        })
    }

    fn fingerprint_ops(&self, from: &Entity, to: &Entity) -> MergeResult<ChangeOps> {
        let mut ops = ChangeOps::new();

        for label in from.fingerprint.labels.iter() {
            match to.label(&label.language) {
                None => ops.add(ChangeOp::set_label(&label.language, &label.text)),
                Some(text) if text == label.text => {}
                Some(_) if self.ignore.contains(ConflictKind::Label) => {
                    ops.add(ChangeOp::add_aliases(&label.language, [&label.text]));
                }
                Some(_) => return Err(conflict(ConflictKind::Label, &label.language)),
            }
        }

        for description in from.fingerprint.descriptions.iter() {
            match to.description(&description.language) {
                None => ops.add(ChangeOp::set_description(
                    &description.language,
                    &description.text,
                )),
                Some(text) if text == description.text => {}
                Some(_) if self.ignore.contains(ConflictKind::Description) => {}
                Some(_) => return Err(conflict(ConflictKind::Description, &description.language)),
            }
        }

        for group in from.fingerprint.aliases.iter() {
            ops.add(ChangeOp::add_aliases(&group.language, group.texts()));
        }
        Ok(ops)
    }

    fn site_link_ops(&self, from: &Entity, to: &Entity) -> MergeResult<Vec<ChangeOp>> {
        let mut ops = Vec::new();
        for link in from.site_links.iter() {
            match to.site_links.get(&link.site_id) {
                None => ops.push(ChangeOp::SetSiteLink {
                    site_id: link.site_id.clone(),
                    page_name: link.page_name.clone(),
                    badges: Some(link.badges.clone()),
                }),
                Some(existing) if existing.page_name == link.page_name => {}
                Some(_) if self.ignore.contains(ConflictKind::SiteLink) => {}
                Some(_) => return Err(conflict(ConflictKind::SiteLink, &link.site_id)),
            }
        }
        Ok(ops)
    }
}

fn conflict(kind: ConflictKind, key: &str) -> MergeError {
    debug!("merge conflict on {kind} {key}");
    MergeError::Conflict {
        kind,
        key: key.to_string(),
    }
}

fn check_preconditions(from: &Entity, to: &Entity) -> MergeResult<(EntityId, EntityId)> {
    let (Some(from_id), Some(to_id)) = (from.id, to.id) else {
        return Err(MergeError::MissingId);
    };
    if from_id == to_id {
        return Err(MergeError::SameEntity(from_id));
    }
    if from.entity_type != to.entity_type {
        return Err(MergeError::TypeMismatch {
            from: from.entity_type,
            to: to.entity_type,
        });
    }
    let links_to = |entity: &Entity, target: EntityId| {
        entity
            .statements
            .iter()
            .any(|s| s.referenced_entities().any(|id| id == target))
    };
    if links_to(from, to_id) || links_to(to, from_id) {
        return Err(MergeError::CrossLinked {
            from: from_id,
            to: to_id,
        });
    }
    Ok((from_id, to_id))
}
