//! Error catalog schema: maps error codes to friendly names and doc links.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDefinition {
    pub code: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Top-level catalog document.
pub struct ErrorDefinitionDoc {
    #[serde(rename = "ErrorDefinitions")]
    pub error_definitions: Vec<ErrorDefinition>,
}

#[derive(Debug, Clone, Default)]
/// Lookup table keyed by error code.
pub struct ErrorCatalog {
    entries: HashMap<String, ErrorDefinition>,
}

impl ErrorCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&ErrorDefinition> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<ErrorDefinitionDoc> for ErrorCatalog {
    fn from(doc: ErrorDefinitionDoc) -> Self {
        // Later definitions of a code replace earlier ones.
        let entries = doc
            .error_definitions
            .into_iter()
            .map(|def| (def.code.clone(), def))
            .collect();
        Self { entries }
    }
}

impl FromIterator<ErrorDefinition> for ErrorCatalog {
    fn from_iter<I: IntoIterator<Item = ErrorDefinition>>(iter: I) -> Self {
        ErrorDefinitionDoc {
            error_definitions: iter.into_iter().collect(),
        }
        .into()
    }
}
