//! Handler registry configuration file support.
//!
//! The file maps a handler name (the first path segment after the route
//! prefix) to a provider. JSON files (`.json`) and TOML files (anything
//! else) are accepted:
//!
//! ```json
//! { "github": "github", "ugent": { "kind": "biblio", "base_url": "https://biblio.ugent.be" } }
//! ```
//!
//! ```toml
//! demo = "demo"
//!
//! [gh]
//! kind = "github"
//! page_length = 25
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{RegistryError, RegistryResult};

/// Settings for one registered provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Provider kind (`demo`, `biblio`, `github`, `zenodo`).
    pub kind: String,
    /// Override of the upstream API root.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Records per upstream page (paging providers only).
    #[serde(default)]
    pub page_length: Option<u32>,
}

impl ProviderSettings {
    pub fn from_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

/// A registry entry: either just a kind, or a table of settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerEntry {
    Kind(String),
    Detailed(ProviderSettings),
}

impl HandlerEntry {
    pub fn settings(&self) -> ProviderSettings {
        match self {
            HandlerEntry::Kind(kind) => ProviderSettings::from_kind(kind.clone()),
            HandlerEntry::Detailed(settings) => settings.clone(),
        }
    }
}

/// Handler name → provider mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlersConfig {
    pub handlers: BTreeMap<String, HandlerEntry>,
}

impl HandlersConfig {
    /// Load the mapping from a file, choosing the format by extension.
    ///
    /// # Returns
    /// * `Ok(HandlersConfig)` if successful
    /// * `Err(RegistryError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RegistryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        };

        parsed.map_err(|e| match e {
            RegistryError::Config(msg) => {
                RegistryError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> RegistryResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| RegistryError::Config(format!("Failed to parse JSON handlers: {}", e)))
    }

    pub fn from_toml(content: &str) -> RegistryResult<Self> {
        toml::from_str(content)
            .map_err(|e| RegistryError::Config(format!("Failed to parse TOML handlers: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_mixed_entries() {
        let json = r#"{
            "demo": "demo",
            "ugent": { "kind": "biblio", "base_url": "https://biblio.example.org" }
        }"#;

        let config = HandlersConfig::from_json(json).unwrap();
        assert_eq!(config.handlers.len(), 2);
        assert_eq!(config.handlers["demo"].settings(), ProviderSettings::from_kind("demo"));

        let ugent = config.handlers["ugent"].settings();
        assert_eq!(ugent.kind, "biblio");
        assert_eq!(ugent.base_url.as_deref(), Some("https://biblio.example.org"));
        assert_eq!(ugent.page_length, None);
    }

    #[test]
    fn test_parse_toml_tables() {
        let toml = r#"
demo = "demo"

[gh]
kind = "github"
page_length = 25
"#;

        let config = HandlersConfig::from_toml(toml).unwrap();
        let gh = config.handlers["gh"].settings();
        assert_eq!(gh.kind, "github");
        assert_eq!(gh.page_length, Some(25));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(matches!(
            HandlersConfig::from_json("[\"github\"]"),
            Err(RegistryError::Config(_))
        ));
        assert!(matches!(
            HandlersConfig::from_json(r#"{"gh": 12}"#),
            Err(RegistryError::Config(_))
        ));
        assert!(matches!(
            HandlersConfig::from_json(r#"{"gh": {"kind": "github", "per_page": 5}}"#),
            Err(RegistryError::Config(_))
        ));
    }
}
