//! Engine configuration, read from a TOML file.
//!
//! ```toml
//! [edit]
//! allow_self_conflict_patch = true
//! watch_on_edit = false
//!
//! [validation]
//! max_term_length = 250
//! languages = ["en", "de"]
//! ```
//!
//! Every key is optional. A missing or unreadable file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use wbedit_validation::ValidationLimits;

/// Settings for the edit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Whether an editor conflicting only with their own newer revision
    /// may have the surviving part of the edit saved.
    pub allow_self_conflict_patch: bool,
    /// Watch flag used when a save does not specify one.
    pub watch_on_edit: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            allow_self_conflict_patch: true,
            watch_on_edit: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub edit: EditConfig,
    pub validation: ValidationLimits,
}

impl EngineConfig {
    /// Parses a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded engine config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse config file {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config_from_str(toml_content: &str) -> EngineConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wbedit.toml");
        std::fs::write(&path, toml_content).unwrap();
        EngineConfig::load_from(path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path().join("nonexistent.toml"));
        assert_eq!(config, EngineConfig::default());
        assert!(config.edit.allow_self_conflict_patch);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let config = load_config_from_str("[edit\nallow_self_conflict_patch = ");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn wrong_types_give_defaults() {
        let config = load_config_from_str("[edit]\nwatch_on_edit = \"yes\"\n");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = load_config_from_str(
            r#"
[edit]
allow_self_conflict_patch = false

[validation]
max_term_length = 100
languages = ["en", "de"]
badges = ["Q17437796"]
"#,
        );
        assert!(!config.edit.allow_self_conflict_patch);
        assert!(!config.edit.watch_on_edit);
        assert_eq!(config.validation.max_term_length, 100);
        assert_eq!(config.validation.max_page_name_length, 255);
        assert_eq!(config.validation.languages, ["en", "de"]);
        assert_eq!(config.validation.badges, ["Q17437796"]);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(load_config_from_str(""), EngineConfig::default());
    }
}
