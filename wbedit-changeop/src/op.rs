use crate::fingerprint::{self, AliasMode, TermField};
use crate::{ChangeOpContext, ChangeOpResult, site_links, statements};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use wbedit_model::{Entity, EntityId, Rank, Reference, Snak, Statement, StatementGuid, Summary};
use wbedit_validation::ValidationResult;

/// One atomic mutation of an entity.
///
/// Each variant carries only the fields it needs. [`ChangeOp::validate`]
/// checks the proposed values without touching the entity;
/// [`ChangeOp::apply`] consumes a working copy and returns it mutated.
/// `apply` does not re-validate, so callers validate first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeOp {
    SetLabel {
        language: String,
        text: String,
    },
    RemoveLabel {
        language: String,
    },
    SetDescription {
        language: String,
        text: String,
    },
    RemoveDescription {
        language: String,
    },
    AddAliases {
        language: String,
        aliases: Vec<String>,
    },
    SetAliases {
        language: String,
        aliases: Vec<String>,
    },
    RemoveAliases {
        language: String,
        aliases: Vec<String>,
    },
    SetSiteLink {
        site_id: String,
        page_name: String,
        /// `None` keeps the current badges if the page does not change.
        badges: Option<BTreeSet<EntityId>>,
    },
    RemoveSiteLink {
        site_id: String,
    },
    /// Sets the main snak of a statement; without a GUID a new statement
    /// is created and the generated GUID is stored here.
    SetMainSnak {
        guid: Option<StatementGuid>,
        snak: Snak,
    },
    SetStatement {
        statement: Statement,
        index: Option<usize>,
    },
    RemoveStatement {
        guid: StatementGuid,
    },
    SetQualifier {
        guid: StatementGuid,
        snak: Snak,
        snak_hash: Option<String>,
    },
    RemoveQualifier {
        guid: StatementGuid,
        snak_hash: String,
    },
    SetReference {
        guid: StatementGuid,
        reference: Reference,
        hash: Option<String>,
        index: Option<usize>,
    },
    RemoveReference {
        guid: StatementGuid,
        hash: String,
    },
    SetStatementRank {
        guid: StatementGuid,
        rank: Rank,
    },
}

impl ChangeOp {
    pub fn set_label(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::SetLabel {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn remove_label(language: impl Into<String>) -> Self {
        Self::RemoveLabel {
            language: language.into(),
        }
    }

    pub fn set_description(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::SetDescription {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn remove_description(language: impl Into<String>) -> Self {
        Self::RemoveDescription {
            language: language.into(),
        }
    }

    pub fn add_aliases<S: Into<String>>(
        language: impl Into<String>,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::AddAliases {
            language: language.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn set_aliases<S: Into<String>>(
        language: impl Into<String>,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::SetAliases {
            language: language.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remove_aliases<S: Into<String>>(
        language: impl Into<String>,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::RemoveAliases {
            language: language.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn set_site_link(site_id: impl Into<String>, page_name: impl Into<String>) -> Self {
        Self::SetSiteLink {
            site_id: site_id.into(),
            page_name: page_name.into(),
            badges: None,
        }
    }

    pub fn remove_site_link(site_id: impl Into<String>) -> Self {
        Self::RemoveSiteLink {
            site_id: site_id.into(),
        }
    }

    /// A main-snak op creating a new statement.
    #[must_use]
    pub fn new_statement(snak: Snak) -> Self {
        Self::SetMainSnak { guid: None, snak }
    }

    #[must_use]
    pub fn set_main_snak(guid: StatementGuid, snak: Snak) -> Self {
        Self::SetMainSnak {
            guid: Some(guid),
            snak,
        }
    }

    #[must_use]
    pub fn set_statement(statement: Statement) -> Self {
        Self::SetStatement {
            statement,
            index: None,
        }
    }

    #[must_use]
    pub fn remove_statement(guid: StatementGuid) -> Self {
        Self::RemoveStatement { guid }
    }

    #[must_use]
    pub fn add_reference(guid: StatementGuid, reference: Reference) -> Self {
        Self::SetReference {
            guid,
            reference,
            hash: None,
            index: None,
        }
    }

    pub fn replace_reference(
        guid: StatementGuid,
        hash: impl Into<String>,
        reference: Reference,
    ) -> Self {
        Self::SetReference {
            guid,
            reference,
            hash: Some(hash.into()),
            index: None,
        }
    }

    #[must_use]
    pub fn set_rank(guid: StatementGuid, rank: Rank) -> Self {
        Self::SetStatementRank { guid, rank }
    }

    /// The GUID of the statement this op targets. For a main-snak op that
    /// created a statement, this is the GUID it generated.
    #[must_use]
    pub fn statement_guid(&self) -> Option<&StatementGuid> {
        match self {
            Self::SetMainSnak { guid, .. } => guid.as_ref(),
            Self::SetStatement { statement, .. } => statement.guid.as_ref(),
            Self::RemoveStatement { guid }
            | Self::SetQualifier { guid, .. }
            | Self::RemoveQualifier { guid, .. }
            | Self::SetReference { guid, .. }
            | Self::RemoveReference { guid, .. }
            | Self::SetStatementRank { guid, .. } => Some(guid),
            _ => None,
        }
    }

    /// Checks the proposed values against `entity`. Does not mutate.
    pub fn validate(&self, entity: &Entity, ctx: &ChangeOpContext) -> ValidationResult {
        match self {
            Self::SetLabel { language, text } => {
                fingerprint::validate_set_term(TermField::Label, entity, language, text, ctx)
            }
            Self::SetDescription { language, text } => {
                fingerprint::validate_set_term(TermField::Description, entity, language, text, ctx)
            }
            Self::RemoveLabel { language } | Self::RemoveDescription { language } => {
                ctx.validators().validate_language(language)
            }
            Self::AddAliases { language, aliases } => {
                fingerprint::validate_aliases(AliasMode::Add, language, aliases, ctx)
            }
            Self::SetAliases { language, aliases } => {
                fingerprint::validate_aliases(AliasMode::Set, language, aliases, ctx)
            }
            Self::RemoveAliases { language, aliases } => {
                fingerprint::validate_aliases(AliasMode::Remove, language, aliases, ctx)
            }
            Self::SetSiteLink {
                site_id,
                page_name,
                badges,
            } => site_links::validate_set(entity, site_id, page_name, badges.as_ref(), ctx),
            Self::RemoveSiteLink { site_id } => ctx.validators().validate_site_id(site_id),
            Self::SetMainSnak { snak, .. } | Self::SetQualifier { snak, .. } => {
                statements::validate_snak(snak, ctx)
            }
            Self::SetStatement { statement, .. } => statements::validate_statement(statement, ctx),
            Self::SetReference { reference, .. } => statements::validate_reference(reference, ctx),
            Self::RemoveStatement { .. }
            | Self::RemoveQualifier { .. }
            | Self::RemoveReference { .. }
            | Self::SetStatementRank { .. } => ValidationResult::valid(),
        }
    }

    /// Applies the op to the working copy `entity` and returns it.
    ///
    /// On error the working copy is dropped; the caller's own snapshot is
    /// never touched.
    pub fn apply(
        &mut self,
        mut entity: Entity,
        summary: Option<&mut Summary>,
        ctx: &ChangeOpContext,
    ) -> ChangeOpResult<Entity> {
        self.apply_to(&mut entity, summary, ctx)?;
        Ok(entity)
    }

    pub(crate) fn apply_to(
        &mut self,
        entity: &mut Entity,
        summary: Option<&mut Summary>,
        ctx: &ChangeOpContext,
    ) -> ChangeOpResult<()> {
        match self {
            Self::SetLabel { language, text } => {
                fingerprint::apply_set_term(TermField::Label, entity, language, text, summary);
            }
            Self::RemoveLabel { language } => {
                fingerprint::apply_remove_term(TermField::Label, entity, language, summary);
            }
            Self::SetDescription { language, text } => {
                fingerprint::apply_set_term(TermField::Description, entity, language, text, summary);
            }
            Self::RemoveDescription { language } => {
                fingerprint::apply_remove_term(TermField::Description, entity, language, summary);
            }
            Self::AddAliases { language, aliases } => {
                fingerprint::apply_aliases(AliasMode::Add, entity, language, aliases, summary);
            }
            Self::SetAliases { language, aliases } => {
                fingerprint::apply_aliases(AliasMode::Set, entity, language, aliases, summary);
            }
            Self::RemoveAliases { language, aliases } => {
                fingerprint::apply_aliases(AliasMode::Remove, entity, language, aliases, summary);
            }
            Self::SetSiteLink {
                site_id,
                page_name,
                badges,
            } => site_links::apply_set(entity, site_id, page_name, badges.as_ref(), summary)?,
            Self::RemoveSiteLink { site_id } => site_links::apply_remove(entity, site_id, summary)?,
            Self::SetMainSnak { guid, snak } => {
                statements::apply_main_snak(entity, guid, snak, summary, ctx)?;
            }
            Self::SetStatement { statement, index } => {
                statements::apply_set_statement(entity, statement, *index, summary, ctx)?;
            }
            Self::RemoveStatement { guid } => {
                statements::apply_remove_statement(entity, guid, summary)?;
            }
            Self::SetQualifier {
                guid,
                snak,
                snak_hash,
            } => statements::apply_set_qualifier(entity, guid, snak, snak_hash.as_deref(), summary)?,
            Self::RemoveQualifier { guid, snak_hash } => {
                statements::apply_remove_qualifier(entity, guid, snak_hash, summary)?;
            }
            Self::SetReference {
                guid,
                reference,
                hash,
                index,
            } => statements::apply_set_reference(
                entity,
                guid,
                reference,
                hash.as_deref(),
                *index,
                summary,
            )?,
            Self::RemoveReference { guid, hash } => {
                statements::apply_remove_reference(entity, guid, hash, summary)?;
            }
            Self::SetStatementRank { guid, rank } => {
                statements::apply_rank(entity, guid, *rank, summary)?;
            }
        }
        Ok(())
    }
}
