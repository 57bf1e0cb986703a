use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::legallens::models::{LegalAnalysis, LegalAnalysisRecord};

const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AnalyzeContentDto {
    /// Marketing copy to review
    #[validate(length(min = 1, max = 20000))]
    pub content: String,

    /// e.g. "social_post", "email", "landing_page"
    #[validate(length(max = 50))]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LegalAnalysisResponseDto {
    /// Absent when the analysis was a fallback and therefore not stored
    pub id: Option<Uuid>,
    pub content_hash: String,
    pub content_type: Option<String>,
    /// True when served from history without calling the model
    pub cached: bool,
    pub rules_checked: usize,
    pub analysis: LegalAnalysis,
    pub created_at: DateTime<Utc>,
}

impl LegalAnalysisResponseDto {
    pub fn from_record(
        record: LegalAnalysisRecord,
        cached: bool,
        rules_checked: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            analysis: serde_json::from_value(record.result)?,
            id: Some(record.id),
            content_hash: record.content_hash,
            content_type: record.content_type,
            cached,
            rules_checked,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LegalHistoryItemDto {
    pub id: Uuid,
    pub content_hash: String,
    pub content_type: Option<String>,
    /// Start of the reviewed content
    pub excerpt: String,
    pub overall_score: f64,
    pub analysis: LegalAnalysis,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LegalAnalysisRecord> for LegalHistoryItemDto {
    type Error = serde_json::Error;

    fn try_from(r: LegalAnalysisRecord) -> Result<Self, Self::Error> {
        let mut excerpt: String = r.content.chars().take(EXCERPT_CHARS).collect();
        if r.content.chars().count() > EXCERPT_CHARS {
            excerpt.push_str("...");
        }

        Ok(Self {
            analysis: serde_json::from_value(r.result)?,
            id: r.id,
            content_hash: r.content_hash,
            content_type: r.content_type,
            excerpt,
            overall_score: r.overall_score,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_excerpt_is_truncated() {
        let record = LegalAnalysisRecord {
            id: Uuid::new_v4(),
            content_hash: "0123456789abcdef".to_string(),
            rules_fingerprint: "fedcba9876543210".to_string(),
            content: "x".repeat(500),
            content_type: None,
            overall_score: 90.0,
            result: serde_json::json!({ "overall_score": 90.0 }),
            created_at: Utc::now(),
        };

        let item = LegalHistoryItemDto::try_from(record).unwrap();
        assert_eq!(item.excerpt.len(), EXCERPT_CHARS + 3);
        assert!(item.analysis.is_llm_success);
    }

    #[test]
    fn test_empty_content_rejected() {
        let dto = AnalyzeContentDto {
            content: String::new(),
            content_type: None,
        };
        assert!(dto.validate().is_err());
    }
}
