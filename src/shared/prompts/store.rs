//! Template lookup by `(type, target_id)`.
//!
//! The database is the primary store. A JSON file shipped with the service
//! fills in any layer that has no active row.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use crate::shared::constants::GLOBAL_TARGET_ID;

/// Which layer of the composed prompt a template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    System,
    Persona,
    Brand,
}

impl PromptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptType::System => "system",
            PromptType::Persona => "persona",
            PromptType::Brand => "brand",
        }
    }
}

impl FromStr for PromptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(PromptType::System),
            "persona" => Ok(PromptType::Persona),
            "brand" => Ok(PromptType::Brand),
            other => Err(format!("Unknown prompt type '{}'", other)),
        }
    }
}

impl std::fmt::Display for PromptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System templates are stored under `"global"`; a missing target means the same.
pub fn normalize_target_id(prompt_type: PromptType, target_id: Option<&str>) -> Option<String> {
    match (prompt_type, target_id.map(str::trim).filter(|t| !t.is_empty())) {
        (PromptType::System, None) => Some(GLOBAL_TARGET_ID.to_string()),
        (_, target) => target.map(str::to_string),
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template lookup failed: {0}")]
    Lookup(String),

    #[error("Failed to load template file '{path}': {reason}")]
    File { path: String, reason: String },
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Active template text for `(prompt_type, target_id)`, if any
    async fn find_active(
        &self,
        prompt_type: PromptType,
        target_id: &str,
    ) -> Result<Option<String>, TemplateError>;
}

/// One entry of the template file
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateFileEntry {
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    #[serde(default)]
    pub target_id: Option<String>,
    pub prompt_template: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Templates held in memory, loaded from a JSON file or built directly
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: HashMap<(PromptType, String), String>,
}

impl InMemoryTemplateStore {
    pub fn from_entries(entries: impl IntoIterator<Item = TemplateFileEntry>) -> Self {
        let mut templates = HashMap::new();
        for entry in entries.into_iter().filter(|e| e.is_active) {
            if let Some(target) = normalize_target_id(entry.prompt_type, entry.target_id.as_deref())
            {
                templates.insert((entry.prompt_type, target), entry.prompt_template);
            }
        }
        Self { templates }
    }

    /// Load a JSON array of [`TemplateFileEntry`]. A missing file yields an empty store.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Template file {} not found, using empty store", path.display());
            return Ok(Self::default());
        }

        let file_error = |reason: String| TemplateError::File {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let entries: Vec<TemplateFileEntry> =
            serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?;

        let store = Self::from_entries(entries);
        tracing::info!(
            "Loaded {} fallback prompt templates from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn find_active(
        &self,
        prompt_type: PromptType,
        target_id: &str,
    ) -> Result<Option<String>, TemplateError> {
        Ok(self
            .templates
            .get(&(prompt_type, target_id.to_string()))
            .cloned())
    }
}

/// Consult `primary` first; use `fallback` when it has nothing or fails.
pub struct FallbackTemplateStore {
    primary: Arc<dyn TemplateStore>,
    fallback: Arc<dyn TemplateStore>,
}

impl FallbackTemplateStore {
    pub fn new(primary: Arc<dyn TemplateStore>, fallback: Arc<dyn TemplateStore>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TemplateStore for FallbackTemplateStore {
    async fn find_active(
        &self,
        prompt_type: PromptType,
        target_id: &str,
    ) -> Result<Option<String>, TemplateError> {
        match self.primary.find_active(prompt_type, target_id).await {
            Ok(Some(template)) => return Ok(Some(template)),
            Ok(None) => {
                tracing::debug!(
                    "Template {}/{} not found in primary store, trying fallback",
                    prompt_type,
                    target_id
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Primary lookup failed for template {}/{}: {}, falling back",
                    prompt_type,
                    target_id,
                    e
                );
            }
        }

        self.fallback.find_active(prompt_type, target_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    #[async_trait]
    impl TemplateStore for FailingStore {
        async fn find_active(
            &self,
            _prompt_type: PromptType,
            _target_id: &str,
        ) -> Result<Option<String>, TemplateError> {
            Err(TemplateError::Lookup("connection refused".to_string()))
        }
    }

    fn entry(prompt_type: PromptType, target_id: Option<&str>, text: &str) -> TemplateFileEntry {
        TemplateFileEntry {
            prompt_type,
            target_id: target_id.map(str::to_string),
            prompt_template: text.to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_normalize_target_id() {
        assert_eq!(
            normalize_target_id(PromptType::System, None),
            Some("global".to_string())
        );
        assert_eq!(
            normalize_target_id(PromptType::System, Some(" ")),
            Some("global".to_string())
        );
        assert_eq!(
            normalize_target_id(PromptType::Brand, Some("apple")),
            Some("apple".to_string())
        );
        assert_eq!(normalize_target_id(PromptType::Persona, None), None);
    }

    #[test]
    fn test_prompt_type_from_str() {
        assert_eq!("brand".parse::<PromptType>(), Ok(PromptType::Brand));
        assert!("Brand".parse::<PromptType>().is_err());
    }

    #[tokio::test]
    async fn test_in_memory_store_skips_inactive_entries() {
        let mut inactive = entry(PromptType::Brand, Some("apple"), "old");
        inactive.is_active = false;
        let store = InMemoryTemplateStore::from_entries(vec![
            inactive,
            entry(PromptType::System, None, "system text"),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_active(PromptType::System, "global").await.unwrap(),
            Some("system text".to_string())
        );
        assert!(store
            .find_active(PromptType::Brand, "apple")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_fallback_store_prefers_primary() {
        let primary = Arc::new(InMemoryTemplateStore::from_entries(vec![entry(
            PromptType::Brand,
            Some("apple"),
            "from db",
        )]));
        let fallback = Arc::new(InMemoryTemplateStore::from_entries(vec![
            entry(PromptType::Brand, Some("apple"), "from file"),
            entry(PromptType::System, None, "file system"),
        ]));
        let store = FallbackTemplateStore::new(primary, fallback);

        assert_eq!(
            store.find_active(PromptType::Brand, "apple").await.unwrap(),
            Some("from db".to_string())
        );
        assert_eq!(
            store.find_active(PromptType::System, "global").await.unwrap(),
            Some("file system".to_string())
        );
    }

    #[tokio::test]
    async fn test_fallback_store_survives_primary_error() {
        let fallback = Arc::new(InMemoryTemplateStore::from_entries(vec![entry(
            PromptType::Persona,
            Some("gen-z"),
            "file persona",
        )]));
        let store = FallbackTemplateStore::new(Arc::new(FailingStore), fallback);

        assert_eq!(
            store.find_active(PromptType::Persona, "gen-z").await.unwrap(),
            Some("file persona".to_string())
        );
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let store = InMemoryTemplateStore::from_file("does/not/exist.json").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_shipped_template_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/prompts.json");
        let store = InMemoryTemplateStore::from_file(path).unwrap();
        assert!(!store.is_empty());
    }
}
