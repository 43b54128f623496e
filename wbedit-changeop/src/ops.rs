use crate::{ChangeOp, ChangeOpContext, ChangeOpError, ChangeOpResult};
use tracing::debug;
use wbedit_model::{Entity, Summary};
use wbedit_validation::ValidationResult;

/// An ordered sequence of change ops applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeOps {
    ops: Vec<ChangeOp>,
}

impl ChangeOps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, op: ChangeOp) {
        self.ops.push(op);
    }

    #[must_use]
    pub fn with(mut self, op: ChangeOp) -> Self {
        self.add(op);
        self
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = ChangeOp>) {
        self.ops.extend(ops);
    }

    #[must_use]
    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Validates every op against the same snapshot, stopping at the
    /// first invalid one.
    pub fn validate(&self, entity: &Entity, ctx: &ChangeOpContext) -> ValidationResult {
        self.ops
            .iter()
            .map(|op| op.validate(entity, ctx))
            .find(|result| !result.is_valid())
            .unwrap_or_default()
    }

    /// Applies the ops in order. The first failing op aborts the sequence
    /// and the partially edited working copy is dropped.
    ///
    /// A single op leaves its own module and action on the summary; several
    /// ops are summarized as an entity edit.
    pub fn apply(
        &mut self,
        mut entity: Entity,
        mut summary: Option<&mut Summary>,
        ctx: &ChangeOpContext,
    ) -> ChangeOpResult<Entity> {
        let total = self.ops.len();
        for (position, op) in self.ops.iter_mut().enumerate() {
            if let Err(err) = op.apply_to(&mut entity, summary.as_deref_mut(), ctx) {
                debug!("change op {position} of {total} failed: {err}");
                return Err(err);
            }
        }
        if total > 1
            && let Some(summary) = summary
        {
            summary.set_module("wbeditentity");
            summary.set_action("update");
        }
        Ok(entity)
    }

    /// Validates, then applies. An invalid op becomes
    /// [`ChangeOpError::Validation`] before anything is applied.
    pub fn validate_and_apply(
        &mut self,
        entity: Entity,
        summary: Option<&mut Summary>,
        ctx: &ChangeOpContext,
    ) -> ChangeOpResult<Entity> {
        let result = self.validate(&entity, ctx);
        if !result.is_valid() {
            return Err(ChangeOpError::Validation(result));
        }
        self.apply(entity, summary, ctx)
    }
}

impl From<Vec<ChangeOp>> for ChangeOps {
    fn from(ops: Vec<ChangeOp>) -> Self {
        Self { ops }
    }
}

impl FromIterator<ChangeOp> for ChangeOps {
    fn from_iter<I: IntoIterator<Item = ChangeOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}
