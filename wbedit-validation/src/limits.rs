use serde::{Deserialize, Serialize};

/// Limits and allow-lists for term and site-link validation.
///
/// Empty `languages`, `sites` or `badges` lists mean "anything that is
/// syntactically valid".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_term_length: usize,
    pub max_page_name_length: usize,
    pub languages: Vec<String>,
    pub sites: Vec<String>,
    /// Item ids usable as site-link badges (`Q17437796`).
    pub badges: Vec<String>,
    pub language_pattern: String,
    pub site_id_pattern: String,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_term_length: 250,
            max_page_name_length: 255,
            languages: Vec::new(),
            sites: Vec::new(),
            badges: Vec::new(),
            language_pattern: r"^[a-z]{2,3}(-[a-z0-9]+)*$".to_string(),
            site_id_pattern: r"^[a-z][a-z0-9_]*$".to_string(),
        }
    }
}
