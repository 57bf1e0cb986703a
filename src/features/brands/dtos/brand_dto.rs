use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::brands::models::Brand;
use crate::shared::validation::SLUG_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBrandDto {
    /// Slug id, e.g. "apple"
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = *SLUG_REGEX,
            message = "id must be a lowercase slug (e.g., 'apple', 'coca-cola')"
        )
    )]
    pub id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub tone: String,

    #[serde(default)]
    pub values: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub industry: String,
}

/// Full replacement of a brand; every field is written
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBrandDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub tone: String,

    #[serde(default)]
    pub values: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub industry: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tone: String,
    pub values: String,
    pub industry: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Brand> for BrandResponseDto {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            tone: b.tone,
            values: b.values,
            industry: b.industry,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_brand_rejects_bad_slug() {
        let dto: CreateBrandDto =
            serde_json::from_value(serde_json::json!({"id": "Apple Inc", "name": "Apple"}))
                .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_brand_defaults_optional_text() {
        let dto: CreateBrandDto =
            serde_json::from_value(serde_json::json!({"id": "apple", "name": "Apple"})).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.tone, "");
        assert_eq!(dto.values, "");
    }
}
