//! Primitive validators.

use crate::lookup::PropertyDataTypeLookup;
use crate::{ConfigError, ConfigResult, ValidationError, ValidationResult, ValueValidator};
use regex::Regex;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;
use wbedit_model::{EntityId, EntityType, Snak};

/// Checks the length of a string in characters.
#[derive(Debug, Clone, Copy)]
pub struct LengthValidator {
    min: usize,
    max: usize,
}

impl LengthValidator {
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl ValueValidator<str> for LengthValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.chars().count();
        if len < self.min {
            ValidationResult::invalid(
                ValidationError::new("too-short")
                    .with("length", len)
                    .with("min", self.min),
            )
        } else if len > self.max {
            ValidationResult::invalid(
                ValidationError::new("too-long")
                    .with("length", len)
                    .with("max", self.max),
            )
        } else {
            ValidationResult::valid()
        }
    }
}

/// Requires the whole string to match a regular expression.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    regex: Regex,
}

impl PatternValidator {
    pub fn new(pattern: &str) -> ConfigResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }
}

impl ValueValidator<str> for PatternValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        if self.regex.is_match(value) {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(ValidationError::new("malformed").with("value", value))
        }
    }
}

/// Requires the value to be one of a fixed set.
#[derive(Debug, Clone)]
pub struct MembershipValidator<T> {
    allowed: BTreeSet<T>,
    code: &'static str,
}

impl<T: Ord> MembershipValidator<T> {
    pub fn new(allowed: impl IntoIterator<Item = T>, code: &'static str) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            code,
        }
    }
}

impl<T, Q> ValueValidator<Q> for MembershipValidator<T>
where
    T: Borrow<Q> + Ord + Send + Sync,
    Q: Ord + Display + ?Sized,
{
    fn validate(&self, value: &Q) -> ValidationResult {
        if self.allowed.contains(value) {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(ValidationError::new(self.code).with("value", value))
        }
    }
}

/// Rejects leading or trailing whitespace and control characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceValidator;

impl ValueValidator<str> for WhitespaceValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        let padded = value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace);
        if padded || value.chars().any(char::is_control) {
            ValidationResult::invalid(ValidationError::new("malformed").with("value", value))
        } else {
            ValidationResult::valid()
        }
    }
}

/// Rejects strings that parse as an entity id of the given type.
#[derive(Debug, Clone, Copy)]
pub struct NotEntityIdValidator {
    entity_type: EntityType,
}

impl NotEntityIdValidator {
    #[must_use]
    pub const fn new(entity_type: EntityType) -> Self {
        Self { entity_type }
    }
}

impl ValueValidator<str> for NotEntityIdValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        match EntityId::parse(value) {
            Ok(id) if id.entity_type() == self.entity_type => ValidationResult::invalid(
                ValidationError::new("label-is-entity-id").with("value", value),
            ),
            _ => ValidationResult::valid(),
        }
    }
}

/// Maps a property data type to the value type its snaks must carry.
#[must_use]
pub fn value_type_for_data_type(data_type: &str) -> Option<&'static str> {
    match data_type {
        "string" | "external-id" | "url" | "commonsMedia" => Some("string"),
        "wikibase-item" | "wikibase-property" => Some("wikibase-entityid"),
        "monolingualtext" => Some("monolingualtext"),
        "quantity" => Some("quantity"),
        "time" => Some("time"),
        _ => None,
    }
}

/// Checks that a snak's property exists and its value matches the
/// property's data type.
#[derive(Clone)]
pub struct SnakValidator {
    data_types: Arc<dyn PropertyDataTypeLookup>,
}

impl SnakValidator {
    pub fn new(data_types: Arc<dyn PropertyDataTypeLookup>) -> Self {
        Self { data_types }
    }
}

impl ValueValidator<Snak> for SnakValidator {
    fn validate(&self, snak: &Snak) -> ValidationResult {
        let property = snak.property_id();
        let Some(data_type) = self.data_types.data_type(property) else {
            return ValidationResult::invalid(
                ValidationError::new("no-such-property").with("property", property),
            );
        };
        let Some(value) = snak.data_value() else {
            return ValidationResult::valid();
        };
        match value_type_for_data_type(&data_type) {
            Some(expected) if expected == value.type_id() => ValidationResult::valid(),
            expected => ValidationResult::invalid(
                ValidationError::new("bad-value-type")
                    .with("property", property)
                    .with("expected", expected.unwrap_or("unknown"))
                    .with("actual", value.type_id()),
            ),
        }
    }
}
