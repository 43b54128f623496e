//! Label, description and alias change ops.

use crate::ChangeOpContext;
use serde_json::Value;
use wbedit_model::{Entity, Summary, TermList};
use wbedit_validation::ValidationResult;

/// Which term list a label or description op targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TermField {
    Label,
    Description,
}

impl TermField {
    fn module(self) -> &'static str {
        match self {
            Self::Label => "wbsetlabel",
            Self::Description => "wbsetdescription",
        }
    }

    fn terms(self, entity: &mut Entity) -> &mut TermList {
        match self {
            Self::Label => &mut entity.fingerprint.labels,
            Self::Description => &mut entity.fingerprint.descriptions,
        }
    }
}

/// How an alias op combines with the existing aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AliasMode {
    Add,
    Set,
    Remove,
}

impl AliasMode {
    fn action(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Set => "set",
            Self::Remove => "remove",
        }
    }
}

pub(crate) fn validate_set_term(
    field: TermField,
    entity: &Entity,
    language: &str,
    text: &str,
    ctx: &ChangeOpContext,
) -> ValidationResult {
    let validators = ctx.validators();
    let mut result = validators.validate_language(language);
    if result.is_valid() {
        result = match field {
            TermField::Label => validators.validate_label(entity.entity_type, text),
            TermField::Description => validators.validate_description(text),
        };
    }
    if !result.is_valid() {
        return result;
    }

    // uniqueness is checked on the entity as it would look after the edit
    let mut candidate = entity.clone();
    field.terms(&mut candidate).set_text(language, text);
    validators.validate_fingerprint_uniqueness(&candidate)
}

pub(crate) fn apply_set_term(
    field: TermField,
    entity: &mut Entity,
    language: &str,
    text: &str,
    summary: Option<&mut Summary>,
) {
    let previous = field.terms(entity).set_text(language, text);
    if let Some(summary) = summary {
        summary.set_module(field.module());
        summary.set_action(if previous.is_some() { "set" } else { "add" });
        summary.set_language(language);
        summary.add_auto_summary_args([Value::from(text)]);
    }
}

/// Removing a term that is not there is a no-op, but still summarized.
pub(crate) fn apply_remove_term(
    field: TermField,
    entity: &mut Entity,
    language: &str,
    summary: Option<&mut Summary>,
) {
    let removed = field.terms(entity).remove(language);
    if let Some(summary) = summary {
        summary.set_module(field.module());
        summary.set_action("remove");
        summary.set_language(language);
        if let Some(term) = removed {
            summary.add_auto_summary_args([Value::from(term.text)]);
        }
    }
}

pub(crate) fn validate_aliases(
    mode: AliasMode,
    language: &str,
    aliases: &[String],
    ctx: &ChangeOpContext,
) -> ValidationResult {
    let validators = ctx.validators();
    let result = validators.validate_language(language);
    if !result.is_valid() || mode == AliasMode::Remove {
        return result;
    }
    aliases
        .iter()
        .map(|alias| validators.validate_alias(alias))
        .find(|r| !r.is_valid())
        .unwrap_or_default()
}

pub(crate) fn apply_aliases(
    mode: AliasMode,
    entity: &mut Entity,
    language: &str,
    aliases: &[String],
    summary: Option<&mut Summary>,
) {
    let list = &mut entity.fingerprint.aliases;
    match mode {
        AliasMode::Add => list.add_texts(language, aliases.iter().cloned()),
        AliasMode::Set => list.set_texts(language, aliases.iter().cloned()),
        AliasMode::Remove => list.remove_texts(language, aliases),
    }
    if let Some(summary) = summary {
        summary.set_module("wbsetaliases");
        summary.set_action(mode.action());
        summary.set_language(language);
        summary.add_auto_summary_args(aliases.iter().map(|a| Value::from(a.as_str())));
    }
}
