use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::demographics::models::Demographic;
use crate::shared::validation::SLUG_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDemographicDto {
    /// Slug id, e.g. "gen-z"
    #[validate(
        length(min = 1, max = 100),
        regex(path = *SLUG_REGEX, message = "id must be a lowercase slug (e.g., 'gen-z')")
    )]
    pub id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub characteristics: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub age_range: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDemographicDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub characteristics: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub age_range: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DemographicResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub characteristics: String,
    pub age_range: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Demographic> for DemographicResponseDto {
    fn from(d: Demographic) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            characteristics: d.characteristics,
            age_range: d.age_range,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}
