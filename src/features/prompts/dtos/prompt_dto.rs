use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::prompts::models::PromptTemplate;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::prompts::{referenced_variables, PromptType};
use crate::shared::validation::SLUG_REGEX;

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_active() -> bool {
    true
}

// Query params for listing templates
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PromptQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Search in name, target id or template text
    pub search: Option<String>,

    /// Filter by layer
    pub prompt_type: Option<PromptType>,

    /// Filter by target id
    pub target_id: Option<String>,

    /// Filter by active status (true = active, false = inactive, none = all)
    pub is_active: Option<bool>,
}

impl PromptQueryParams {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Create request, also used by PUT as a full replacement
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertPromptDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(rename = "type")]
    pub prompt_type: PromptType,

    /// Persona or brand slug; omitted or "global" for the system template
    #[validate(length(min = 1, max = 100))]
    pub target_id: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub prompt_template: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl UpsertPromptDto {
    /// Persona and brand templates must point at a slug; system templates are global.
    pub fn normalized_target(&self) -> Result<String, String> {
        match crate::shared::prompts::normalize_target_id(
            self.prompt_type,
            self.target_id.as_deref(),
        ) {
            Some(target) if self.prompt_type == PromptType::System => Ok(target),
            Some(target) if SLUG_REGEX.is_match(&target) => Ok(target),
            Some(target) => Err(format!("target_id '{}' must be a lowercase slug", target)),
            None => Err(format!(
                "target_id is required for {} templates",
                self.prompt_type
            )),
        }
    }
}

// Response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct PromptResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub prompt_type: String,
    pub target_id: Option<String>,
    pub prompt_template: String,
    /// `{variable}` names referenced by the template
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PromptTemplate> for PromptResponseDto {
    fn from(p: PromptTemplate) -> Self {
        Self {
            variables: referenced_variables(&p.prompt_template),
            id: p.id,
            name: p.name,
            prompt_type: p.prompt_type,
            target_id: p.target_id,
            prompt_template: p.prompt_template,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Compose the persona prompt without calling a model
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PreviewPromptDto {
    #[validate(length(min = 1, max = 100))]
    pub persona_id: String,

    #[validate(length(min = 1, max = 100))]
    pub brand_id: String,

    /// Extra or overriding substitution values
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromptPreviewDto {
    pub prompt: String,
    pub layers: Vec<PromptType>,
    pub variables: BTreeMap<String, String>,
    /// Tokens left in the prompt because no value was supplied
    pub unresolved: Vec<String>,
}
