//! Site-link change ops. Only items have site links.

use crate::{ChangeOpContext, ChangeOpError, ChangeOpResult};
use serde_json::Value;
use std::collections::BTreeSet;
use wbedit_model::{Entity, EntityId, SiteLink, Summary};
use wbedit_validation::ValidationResult;

fn require_site_links(entity: &Entity) -> ChangeOpResult<()> {
    if entity.supports_site_links() {
        Ok(())
    } else {
        Err(ChangeOpError::SiteLinksUnsupported(entity.entity_type))
    }
}

pub(crate) fn validate_set(
    entity: &Entity,
    site_id: &str,
    page_name: &str,
    badges: Option<&BTreeSet<EntityId>>,
    ctx: &ChangeOpContext,
) -> ValidationResult {
    let validators = ctx.validators();
    let result = validators
        .validate_site_id(site_id)
        .merged(validators.validate_page_name(page_name));
    let result = match badges {
        Some(badges) => result.merged(validators.validate_badges(badges)),
        None => result,
    };
    if !result.is_valid() {
        return result;
    }
    validators.validate_site_link_uniqueness(entity.id, &SiteLink::new(site_id, page_name))
}

/// Sets a link. Without explicit badges the existing badges are kept if
/// the page stays the same, and dropped otherwise.
pub(crate) fn apply_set(
    entity: &mut Entity,
    site_id: &str,
    page_name: &str,
    badges: Option<&BTreeSet<EntityId>>,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    require_site_links(entity)?;

    let existing = entity.site_links.get(site_id);
    let badges = match (badges, existing) {
        (Some(badges), _) => badges.clone(),
        (None, Some(old)) if old.page_name == page_name => old.badges.clone(),
        (None, _) => BTreeSet::new(),
    };
    let action = if existing.is_some() { "set" } else { "add" };

    let mut link = SiteLink::new(site_id, page_name);
    link.badges = badges;
    entity.site_links.set(link);

    if let Some(summary) = summary {
        summary.set_module("wbsetsitelink");
        summary.set_action(action);
        summary.add_auto_comment_args([Value::from(site_id)]);
        summary.add_auto_summary_args([Value::from(page_name)]);
    }
    Ok(())
}

pub(crate) fn apply_remove(
    entity: &mut Entity,
    site_id: &str,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    require_site_links(entity)?;
    let removed = entity.site_links.remove(site_id);
    if let Some(summary) = summary {
        summary.set_module("wbsetsitelink");
        summary.set_action("remove");
        summary.add_auto_comment_args([Value::from(site_id)]);
        if let Some(link) = removed {
            summary.add_auto_summary_args([Value::from(link.page_name)]);
        }
    }
    Ok(())
}
