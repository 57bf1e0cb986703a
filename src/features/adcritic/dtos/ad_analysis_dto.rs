use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::adcritic::models::{AdAnalysis, AdAnalysisRecord};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnalyzeAdDto {
    /// `https://` URL or `data:image/...;base64,...` data URL
    #[validate(length(min = 1), custom(function = "validate_image_url"))]
    pub image_url: String,

    /// Brand the ad is for; its profile is included in the prompt
    #[validate(length(min = 1, max = 100))]
    pub brand_id: Option<String>,

    #[validate(length(max = 500))]
    pub target_audience: Option<String>,

    /// Campaign goal or other notes for the reviewer
    #[validate(length(max = 2000))]
    pub context: Option<String>,
}

fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    let ok = url.starts_with("https://")
        || url.starts_with("http://")
        || (url.starts_with("data:image/") && url.contains(";base64,"));

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("image_url");
        err.message = Some("image_url must be an http(s) URL or a base64 image data URL".into());
        Err(err)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdAnalysisResponseDto {
    /// Absent when the analysis was a fallback and therefore not stored
    pub id: Option<Uuid>,
    pub brand_id: Option<String>,
    pub target_audience: Option<String>,
    pub model: String,
    pub analysis: AdAnalysis,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AdAnalysisRecord> for AdAnalysisResponseDto {
    type Error = serde_json::Error;

    fn try_from(r: AdAnalysisRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            analysis: serde_json::from_value(r.result)?,
            id: Some(r.id),
            brand_id: r.brand_id,
            target_audience: r.target_audience,
            model: r.model,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(image_url: &str) -> AnalyzeAdDto {
        AnalyzeAdDto {
            image_url: image_url.to_string(),
            brand_id: None,
            target_audience: None,
            context: None,
        }
    }

    #[test]
    fn test_accepts_https_and_data_urls() {
        assert!(dto("https://cdn.example.com/ad.jpg").validate().is_ok());
        assert!(dto("data:image/png;base64,iVBORw0KGgo=").validate().is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(dto("ftp://example.com/ad.jpg").validate().is_err());
        assert!(dto("data:text/html;base64,PGgxPg==").validate().is_err());
        assert!(dto("").validate().is_err());
    }
}
