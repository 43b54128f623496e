use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One validation failure: a stable code plus context for message rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub code: String,
    pub context: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value:?}")?;
        }
        Ok(())
    }
}

/// Outcome of a validation: valid, or an ordered list of errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn invalid(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether any error carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Appends the errors of `other`.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }

    /// Drops the errors blaming `entity` for already holding a value, as
    /// the uniqueness checks record it under the `entity` context key.
    #[must_use]
    pub fn ignoring_entity(mut self, entity: impl fmt::Display) -> Self {
        let entity = entity.to_string();
        self.errors.retain(|e| e.context.get("entity") != Some(&entity));
        self
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("valid");
        }
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl FromIterator<ValidationError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}
