use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured edit-summary fragments.
///
/// Change ops append to a summary; rendering it to text is left to an
/// external formatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    module: Option<String>,
    action: Option<String>,
    language: Option<String>,
    #[serde(default)]
    auto_comment_args: Vec<Value>,
    #[serde(default)]
    auto_summary_args: Vec<Value>,
    user_summary: Option<String>,
}

impl Summary {
    /// Creates a summary tagged with a module name (e.g. `wbsetlabel`).
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            ..Self::default()
        }
    }

    pub fn set_module(&mut self, module: impl Into<String>) {
        self.module = Some(module.into());
    }

    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = Some(action.into());
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn add_auto_comment_args(&mut self, args: impl IntoIterator<Item = Value>) {
        self.auto_comment_args.extend(args);
    }

    pub fn add_auto_summary_args(&mut self, args: impl IntoIterator<Item = Value>) {
        self.auto_summary_args.extend(args);
    }

    pub fn set_user_summary(&mut self, text: impl Into<String>) {
        self.user_summary = Some(text.into());
    }

    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// The `module-action` message key, when both are set.
    #[must_use]
    pub fn message_key(&self) -> Option<String> {
        match (&self.module, &self.action) {
            (Some(m), Some(a)) => Some(format!("{m}-{a}")),
            (Some(m), None) => Some(m.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn auto_comment_args(&self) -> &[Value] {
        &self.auto_comment_args
    }

    #[must_use]
    pub fn auto_summary_args(&self) -> &[Value] {
        &self.auto_summary_args
    }

    #[must_use]
    pub fn user_summary(&self) -> Option<&str> {
        self.user_summary.as_deref()
    }
}
