use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::brands::models::Brand;
use crate::features::brands::BrandService;
use crate::features::demographics::models::Demographic;
use crate::features::demographics::DemographicService;
use crate::shared::prompts::{ComposedPrompt, PromptComposer, PromptVariables};

/// Substitution values for a persona talking about a brand
pub fn persona_variables(persona: &Demographic, brand: &Brand) -> PromptVariables {
    PromptVariables::new()
        .with("persona_name", persona.name.as_str())
        .with("persona_description", persona.description.as_str())
        .with("persona_characteristics", persona.characteristics.as_str())
        .with("persona_age_range", persona.age_range.as_str())
        .with("brand_name", brand.name.as_str())
        .with("brand_description", brand.description.as_str())
        .with("brand_tone", brand.tone.as_str())
        .with("brand_values", brand.values.as_str())
        .with("brand_industry", brand.industry.as_str())
}

/// Where persona and brand records come from
#[async_trait]
pub trait PersonaCatalog: Send + Sync {
    async fn persona(&self, id: &str) -> Result<Option<Demographic>>;
    async fn brand(&self, id: &str) -> Result<Option<Brand>>;
}

/// Catalog backed by the admin-managed tables
pub struct DbPersonaCatalog {
    demographics: Arc<DemographicService>,
    brands: Arc<BrandService>,
}

impl DbPersonaCatalog {
    pub fn new(demographics: Arc<DemographicService>, brands: Arc<BrandService>) -> Self {
        Self {
            demographics,
            brands,
        }
    }
}

#[async_trait]
impl PersonaCatalog for DbPersonaCatalog {
    async fn persona(&self, id: &str) -> Result<Option<Demographic>> {
        self.demographics.find(id).await
    }

    async fn brand(&self, id: &str) -> Result<Option<Brand>> {
        self.brands.find(id).await
    }
}

/// A composed prompt together with the values it was rendered with
#[derive(Debug, Clone)]
pub struct PersonaPrompt {
    pub composed: ComposedPrompt,
    pub variables: PromptVariables,
}

/// Loads the persona and brand records and composes their prompt
pub struct PersonaPromptBuilder {
    catalog: Arc<dyn PersonaCatalog>,
    composer: Arc<PromptComposer>,
}

impl PersonaPromptBuilder {
    pub fn new(catalog: Arc<dyn PersonaCatalog>, composer: Arc<PromptComposer>) -> Self {
        Self { catalog, composer }
    }

    /// `overrides` take precedence over values taken from the records
    pub async fn build(
        &self,
        persona_id: &str,
        brand_id: &str,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Result<PersonaPrompt> {
        let (persona, brand) = tokio::try_join!(
            self.catalog.persona(persona_id),
            self.catalog.brand(brand_id)
        )?;

        let persona = persona
            .ok_or_else(|| AppError::NotFound(format!("Demographic '{}' not found", persona_id)))?;
        let brand =
            brand.ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", brand_id)))?;

        let mut variables = persona_variables(&persona, &brand);
        for (name, value) in overrides {
            variables.insert(name, value);
        }

        let composed = self
            .composer
            .compose(persona_id, brand_id, &variables)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(PersonaPrompt {
            composed,
            variables,
        })
    }
}
