//! Statement, qualifier, reference and rank change ops.

use crate::{ChangeOpContext, ChangeOpError, ChangeOpResult};
use serde_json::Value;
use tracing::debug;
use wbedit_model::{Entity, Rank, Reference, Snak, Statement, StatementGuid, Summary};
use wbedit_validation::ValidationResult;

fn snak_arg(snak: &Snak) -> Value {
    serde_json::to_value(snak).unwrap_or_default()
}

fn statement_mut<'a>(
    entity: &'a mut Entity,
    guid: &StatementGuid,
) -> ChangeOpResult<&'a mut Statement> {
    entity
        .statements
        .get_by_guid_mut(guid)
        .ok_or_else(|| ChangeOpError::NoSuchStatement(guid.clone()))
}

fn new_guid(entity: &Entity, ctx: &ChangeOpContext) -> ChangeOpResult<StatementGuid> {
    let id = entity.id.ok_or(ChangeOpError::MissingEntityId)?;
    Ok(ctx.guids().new_guid(&id))
}

fn check_index(index: Option<usize>, len: usize) -> ChangeOpResult<()> {
    match index {
        Some(index) if index > len => Err(ChangeOpError::IndexOutOfRange { index, len }),
        _ => Ok(()),
    }
}

fn require_same_property(
    guid: &StatementGuid,
    current: &Snak,
    new: &Snak,
) -> ChangeOpResult<()> {
    if current.property_id() == new.property_id() {
        Ok(())
    } else {
        Err(ChangeOpError::PropertyMismatch {
            guid: guid.clone(),
            expected: current.property_id(),
            actual: new.property_id(),
        })
    }
}

pub(crate) fn validate_snak(snak: &Snak, ctx: &ChangeOpContext) -> ValidationResult {
    ctx.validators().validate_snak(snak)
}

pub(crate) fn validate_statement(statement: &Statement, ctx: &ChangeOpContext) -> ValidationResult {
    ctx.validators().validate_statement(statement)
}

pub(crate) fn validate_reference(reference: &Reference, ctx: &ChangeOpContext) -> ValidationResult {
    reference
        .snaks
        .iter()
        .fold(ValidationResult::valid(), |acc, snak| {
            acc.merged(ctx.validators().validate_snak(snak))
        })
}

// ── Main snak ────────────────────────────────────────────────────

/// Without a GUID a new statement is appended and its fresh GUID is
/// written back into `guid`.
pub(crate) fn apply_main_snak(
    entity: &mut Entity,
    guid: &mut Option<StatementGuid>,
    snak: &Snak,
    summary: Option<&mut Summary>,
    ctx: &ChangeOpContext,
) -> ChangeOpResult<()> {
    let action = if let Some(existing) = guid.as_ref() {
        let statement = statement_mut(entity, existing)?;
        require_same_property(existing, &statement.main_snak, snak)?;
        statement.main_snak = snak.clone();
        "update"
    } else {
        let fresh = new_guid(entity, ctx)?;
        entity
            .statements
            .push(Statement::new(snak.clone()).with_guid(fresh.clone()))?;
        debug!("created statement {fresh}");
        *guid = Some(fresh);
        "create"
    };
    if let Some(summary) = summary {
        summary.set_module("wbsetclaimvalue");
        summary.set_action(action);
        summary.add_auto_summary_args([snak_arg(snak)]);
    }
    Ok(())
}

// ── Whole statements ─────────────────────────────────────────────

/// Adds a statement, or replaces the one with the same GUID. A statement
/// without a GUID gets a fresh one, written back into `statement`.
pub(crate) fn apply_set_statement(
    entity: &mut Entity,
    statement: &mut Statement,
    index: Option<usize>,
    summary: Option<&mut Summary>,
    ctx: &ChangeOpContext,
) -> ChangeOpResult<()> {
    let guid = match &statement.guid {
        Some(guid) => guid.clone(),
        None => {
            let fresh = new_guid(entity, ctx)?;
            statement.guid = Some(fresh.clone());
            fresh
        }
    };
    let id = entity.id.ok_or(ChangeOpError::MissingEntityId)?;
    if guid.entity_id() != id {
        return Err(ChangeOpError::ForeignGuid { guid, entity: id });
    }

    let statements = &mut entity.statements;
    let action = match statements.index_of_guid(&guid) {
        Some(position) => {
            if let Some(current) = statements.get_by_guid(&guid) {
                require_same_property(&guid, &current.main_snak, &statement.main_snak)?;
            }
            check_index(index, statements.len() - 1)?;
            statements.remove_by_guid(&guid);
            statements.insert(index.unwrap_or(position), statement.clone())?;
            "update"
        }
        None => {
            check_index(index, statements.len())?;
            let at = index.unwrap_or(statements.len());
            statements.insert(at, statement.clone())?;
            "create"
        }
    };
    if let Some(summary) = summary {
        summary.set_module("wbsetclaim");
        summary.set_action(action);
        summary.add_auto_summary_args([snak_arg(&statement.main_snak)]);
    }
    Ok(())
}

pub(crate) fn apply_remove_statement(
    entity: &mut Entity,
    guid: &StatementGuid,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    let removed = entity
        .statements
        .remove_by_guid(guid)
        .ok_or_else(|| ChangeOpError::NoSuchStatement(guid.clone()))?;
    if let Some(summary) = summary {
        summary.set_module("wbremoveclaims");
        summary.set_action("remove");
        summary.add_auto_summary_args([snak_arg(&removed.main_snak)]);
    }
    Ok(())
}

// ── Qualifiers ───────────────────────────────────────────────────

/// Adds a qualifier, or replaces the one with `snak_hash` in place.
pub(crate) fn apply_set_qualifier(
    entity: &mut Entity,
    guid: &StatementGuid,
    snak: &Snak,
    snak_hash: Option<&str>,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    let qualifiers = &mut statement_mut(entity, guid)?.qualifiers;
    let position = snak_hash
        .map(|hash| {
            qualifiers
                .position_of_hash(hash)
                .ok_or_else(|| ChangeOpError::NoSuchQualifier(hash.to_string()))
        })
        .transpose()?;
    if qualifiers.contains(snak) {
        return Err(ChangeOpError::DuplicateQualifier(snak.hash()));
    }
    let action = match position {
        Some(position) => {
            qualifiers.replace(position, snak.clone());
            "update"
        }
        None => {
            qualifiers.push(snak.clone());
            "add"
        }
    };
    if let Some(summary) = summary {
        summary.set_module("wbsetqualifier");
        summary.set_action(action);
        summary.add_auto_summary_args([snak_arg(snak)]);
    }
    Ok(())
}

pub(crate) fn apply_remove_qualifier(
    entity: &mut Entity,
    guid: &StatementGuid,
    snak_hash: &str,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    let removed = statement_mut(entity, guid)?
        .qualifiers
        .remove_by_hash(snak_hash)
        .ok_or_else(|| ChangeOpError::NoSuchQualifier(snak_hash.to_string()))?;
    if let Some(summary) = summary {
        summary.set_module("wbremovequalifiers");
        summary.set_action("remove");
        summary.add_auto_summary_args([snak_arg(&removed)]);
    }
    Ok(())
}

// ── References ───────────────────────────────────────────────────

/// Adds a reference, or replaces the one with `hash`.
///
/// Adding content that is already present anywhere on the statement is a
/// duplicate. When replacing without an explicit index the reference keeps
/// its position, unless equal content already sits elsewhere, in which case
/// that position is the target. Replacing a reference with itself at the
/// same position is a no-op and rejected.
pub(crate) fn apply_set_reference(
    entity: &mut Entity,
    guid: &StatementGuid,
    reference: &Reference,
    hash: Option<&str>,
    index: Option<usize>,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    let references = &mut statement_mut(entity, guid)?.references;
    let new_hash = reference.hash();
    let existing = references.index_of_hash(&new_hash);

    let action = match hash {
        None => {
            if existing.is_some() {
                return Err(ChangeOpError::DuplicateReference(new_hash));
            }
            check_index(index, references.len())?;
            match index {
                Some(index) => references.insert(index, reference.clone()),
                None => references.push(reference.clone()),
            };
            "add"
        }
        Some(hash) => {
            let current = references
                .index_of_hash(hash)
                .ok_or_else(|| ChangeOpError::NoSuchReference(hash.to_string()))?;
            let target = index.or(existing).unwrap_or(current);
            if existing == Some(target) {
                return Err(ChangeOpError::NoChange(format!(
                    "reference {new_hash} already at index {target}"
                )));
            }
            if existing.is_some_and(|position| position != current) {
                return Err(ChangeOpError::DuplicateReference(new_hash));
            }
            check_index(Some(target), references.len() - 1)?;
            references.remove_by_hash(hash);
            references.insert(target, reference.clone());
            "set"
        }
    };
    if let Some(summary) = summary {
        summary.set_module("wbsetreference");
        summary.set_action(action);
        summary.add_auto_summary_args(reference.snaks.iter().map(snak_arg));
    }
    Ok(())
}

pub(crate) fn apply_remove_reference(
    entity: &mut Entity,
    guid: &StatementGuid,
    hash: &str,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    statement_mut(entity, guid)?
        .references
        .remove_by_hash(hash)
        .ok_or_else(|| ChangeOpError::NoSuchReference(hash.to_string()))?;
    if let Some(summary) = summary {
        summary.set_module("wbremovereferences");
        summary.set_action("remove");
        summary.add_auto_summary_args([Value::from(hash)]);
    }
    Ok(())
}

// ── Rank ─────────────────────────────────────────────────────────

pub(crate) fn apply_rank(
    entity: &mut Entity,
    guid: &StatementGuid,
    rank: Rank,
    summary: Option<&mut Summary>,
) -> ChangeOpResult<()> {
    let statement = statement_mut(entity, guid)?;
    let old = std::mem::replace(&mut statement.rank, rank);
    if let Some(summary) = summary {
        summary.set_module("wbsetstatementrank");
        summary.set_action("set");
        summary.add_auto_comment_args([Value::from(old.as_str()), Value::from(rank.as_str())]);
    }
    Ok(())
}
