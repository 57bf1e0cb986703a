use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::store::{PromptType, TemplateError, TemplateStore};
use super::template::{referenced_variables, render, PromptVariables};
use crate::shared::constants::GLOBAL_TARGET_ID;

/// Placed between consecutive layers
pub const LAYER_SEPARATOR: &str = "\n\n";

/// Result of composing the system, persona and brand layers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComposedPrompt {
    pub text: String,
    /// Layers that contributed text, in composition order
    pub layers: Vec<PromptType>,
    /// Template tokens with no value, left verbatim in `text`
    pub unresolved: Vec<String>,
}

impl ComposedPrompt {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn join_layers(layers: &[Option<&str>]) -> String {
    layers
        .iter()
        .flatten()
        .filter(|text| !text.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(LAYER_SEPARATOR)
}

/// Join the present layers in order, then substitute once over the result.
///
/// Absent or blank layers are skipped without leaving a separator behind.
pub fn compose_layers(layers: &[Option<&str>], vars: &PromptVariables) -> String {
    render(&join_layers(layers), vars)
}

/// Builds the persona role-play prompt from stored templates.
pub struct PromptComposer {
    store: Arc<dyn TemplateStore>,
}

impl PromptComposer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub async fn compose(
        &self,
        persona_id: &str,
        brand_id: &str,
        vars: &PromptVariables,
    ) -> Result<ComposedPrompt, TemplateError> {
        let lookups = [
            (PromptType::System, GLOBAL_TARGET_ID),
            (PromptType::Persona, persona_id),
            (PromptType::Brand, brand_id),
        ];

        let mut texts: Vec<Option<String>> = Vec::with_capacity(lookups.len());
        let mut present = Vec::new();
        for (prompt_type, target_id) in lookups {
            let text = self
                .store
                .find_active(prompt_type, target_id)
                .await?
                .filter(|t| !t.trim().is_empty());
            if text.is_some() {
                present.push(prompt_type);
            }
            texts.push(text);
        }

        let borrowed: Vec<Option<&str>> = texts.iter().map(|t| t.as_deref()).collect();
        let joined = join_layers(&borrowed);
        // Taken from the templates, so substituted values are never mistaken for tokens
        let unresolved = referenced_variables(&joined)
            .into_iter()
            .filter(|name| vars.get(name).is_none())
            .collect();
        let text = render(&joined, vars);

        if text.is_empty() {
            tracing::warn!(
                persona_id,
                brand_id,
                "No prompt templates found; composed prompt is empty"
            );
        }

        Ok(ComposedPrompt {
            text,
            layers: present,
            unresolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::prompts::store::{InMemoryTemplateStore, TemplateFileEntry};

    fn entry(prompt_type: PromptType, target_id: Option<&str>, text: &str) -> TemplateFileEntry {
        TemplateFileEntry {
            prompt_type,
            target_id: target_id.map(str::to_string),
            prompt_template: text.to_string(),
            is_active: true,
        }
    }

    fn composer(entries: Vec<TemplateFileEntry>) -> PromptComposer {
        PromptComposer::new(Arc::new(InMemoryTemplateStore::from_entries(entries)))
    }

    fn sample_vars() -> PromptVariables {
        PromptVariables::new()
            .with("persona_name", "Gen Z Consumer")
            .with("brand_name", "Apple")
    }

    #[tokio::test]
    async fn test_compose_orders_system_persona_brand() {
        let composer = composer(vec![
            entry(PromptType::Brand, Some("apple"), "BRAND {brand_name}"),
            entry(PromptType::System, Some("global"), "SYSTEM"),
            entry(PromptType::Persona, Some("gen-z"), "PERSONA {persona_name}"),
        ]);

        let composed = composer
            .compose("gen-z", "apple", &sample_vars())
            .await
            .unwrap();

        assert_eq!(
            composed.text,
            "SYSTEM\n\nPERSONA Gen Z Consumer\n\nBRAND Apple"
        );
        assert_eq!(
            composed.layers,
            vec![PromptType::System, PromptType::Persona, PromptType::Brand]
        );
    }

    #[tokio::test]
    async fn test_compose_skips_missing_persona_layer() {
        let composer = composer(vec![
            entry(PromptType::System, None, "SYSTEM"),
            entry(PromptType::Brand, Some("apple"), "BRAND"),
        ]);

        let composed = composer
            .compose("gen-z", "apple", &sample_vars())
            .await
            .unwrap();

        assert_eq!(composed.text, "SYSTEM\n\nBRAND");
        assert_eq!(composed.layers, vec![PromptType::System, PromptType::Brand]);
    }

    #[tokio::test]
    async fn test_compose_with_no_templates_is_empty() {
        let composed = composer(vec![])
            .compose("gen-z", "apple", &sample_vars())
            .await
            .unwrap();

        assert!(composed.is_empty());
        assert!(composed.layers.is_empty());
    }

    #[tokio::test]
    async fn test_compose_gen_z_apple_example() {
        let composer = composer(vec![
            entry(
                PromptType::Persona,
                Some("gen-z"),
                "You are a {persona_name}.",
            ),
            entry(
                PromptType::Brand,
                Some("apple"),
                "Share your honest view of {brand_name}.",
            ),
        ]);

        let composed = composer
            .compose("gen-z", "apple", &sample_vars())
            .await
            .unwrap();

        assert!(composed.text.contains("Gen Z Consumer"));
        assert!(composed.text.contains("Apple"));
        assert!(!composed.text.contains("{persona_name}"));
        assert!(!composed.text.contains("{brand_name}"));
    }

    #[tokio::test]
    async fn test_compose_uses_targeted_templates_only() {
        let composer = composer(vec![
            entry(PromptType::Brand, Some("nike"), "NIKE"),
            entry(PromptType::Brand, Some("apple"), "APPLE"),
        ]);

        let composed = composer
            .compose("boomer", "nike", &PromptVariables::new())
            .await
            .unwrap();
        assert_eq!(composed.text, "NIKE");
    }

    #[tokio::test]
    async fn test_unresolved_comes_from_templates_not_values() {
        let composer = composer(vec![
            entry(PromptType::System, None, "Mood: {mood}"),
            entry(PromptType::Brand, Some("apple"), "Tone: {brand_tone}"),
        ]);
        let vars = PromptVariables::new().with("brand_tone", "playful {not_a_token}");

        let composed = composer.compose("gen-z", "apple", &vars).await.unwrap();

        assert_eq!(composed.text, "Mood: {mood}\n\nTone: playful {not_a_token}");
        assert_eq!(composed.unresolved, vec!["mood".to_string()]);
    }

    #[test]
    fn test_compose_layers_substitutes_across_layer_boundaries_once() {
        let vars = PromptVariables::new().with("brand_tone", "{persona_name}");
        let out = compose_layers(&[Some("Tone: {brand_tone}"), None, Some("{persona_name}")], &vars);
        assert_eq!(out, "Tone: {persona_name}\n\n{persona_name}");
    }

    #[test]
    fn test_compose_layers_skips_blank_layers() {
        let out = compose_layers(&[Some("A"), Some("   "), Some("B")], &PromptVariables::new());
        assert_eq!(out, "A\n\nB");
    }
}
