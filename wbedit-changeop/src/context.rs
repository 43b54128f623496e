use std::sync::Arc;
use wbedit_types::{GuidGenerator, UuidGuidGenerator};
use wbedit_validation::EditValidators;

/// Everything a change op needs besides the entity: the validators and
/// the statement GUID generator. Built once and shared by reference.
pub struct ChangeOpContext {
    validators: EditValidators,
    guids: Arc<dyn GuidGenerator>,
}

impl ChangeOpContext {
    pub fn new(validators: EditValidators, guids: Arc<dyn GuidGenerator>) -> Self {
        Self { validators, guids }
    }

    /// A context issuing random UUID GUIDs.
    pub fn with_uuid_guids(validators: EditValidators) -> Self {
        Self::new(validators, Arc::new(UuidGuidGenerator))
    }

    pub fn validators(&self) -> &EditValidators {
        &self.validators
    }

    pub fn guids(&self) -> &dyn GuidGenerator {
        self.guids.as_ref()
    }
}
