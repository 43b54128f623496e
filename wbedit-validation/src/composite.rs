use crate::{ValidationResult, ValueValidator};

/// How a [`CompositeValidator`] treats errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Stop at the first failing validator.
    #[default]
    FailFast,
    /// Run every validator and report all errors.
    CollectAll,
}

/// AND-composition of validators.
pub struct CompositeValidator<T: ?Sized> {
    validators: Vec<Box<dyn ValueValidator<T>>>,
    mode: ValidationMode,
}

impl<T: ?Sized> CompositeValidator<T> {
    #[must_use]
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            validators: Vec::new(),
            mode,
        }
    }

    #[must_use]
    pub fn with(mut self, validator: impl ValueValidator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn push(&mut self, validator: Box<dyn ValueValidator<T>>) {
        self.validators.push(validator);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<T: ?Sized> ValueValidator<T> for CompositeValidator<T> {
    fn validate(&self, value: &T) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for validator in &self.validators {
            result.merge(validator.validate(value));
            if self.mode == ValidationMode::FailFast && !result.is_valid() {
                break;
            }
        }
        result
    }
}
