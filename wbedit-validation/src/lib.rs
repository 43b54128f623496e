//! Validation pipeline for wbedit.
//!
//! Validators are pure functions from a value to a [`ValidationResult`].
//! They compose with AND semantics through [`CompositeValidator`], either
//! stopping at the first error or collecting every error.
//!
//! Only the uniqueness checks consult a collaborator
//! ([`LabelDescriptionDuplicateDetector`], [`SiteLinkConflictLookup`]);
//! everything else is free of I/O.
//!
//! [`EditValidators`] bundles the validators a change op needs. It is built
//! once from [`ValidationLimits`] and the lookups, then passed by reference.

mod composite;
mod edit_validators;
mod limits;
mod lookup;
mod result;
mod validators;

pub use composite::{CompositeValidator, ValidationMode};
pub use edit_validators::EditValidators;
pub use limits::ValidationLimits;
pub use lookup::{
    InMemoryTermIndex, LabelDescriptionDuplicateDetector, PropertyDataTypeLookup,
    PropertyDataTypes, SiteLinkConflictLookup, TermConflict,
};
pub use result::{ValidationError, ValidationResult};
pub use validators::{
    LengthValidator, MembershipValidator, NotEntityIdValidator, PatternValidator, SnakValidator,
    WhitespaceValidator, value_type_for_data_type,
};

/// Result type for building validators.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while assembling validators from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid badge id: {0}")]
    InvalidBadge(#[from] wbedit_types::Error),
}

/// A validator for values of type `T`.
pub trait ValueValidator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;
}
