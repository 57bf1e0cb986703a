use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::sentiment::models::SentimentAnalysis;
use crate::modules::llm::LlmProvider;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SentimentRequestDto {
    /// Topics to gauge, e.g. brand or campaign names
    #[validate(
        length(min = 1, max = 10, message = "Between 1 and 10 queries are allowed"),
        custom(function = "validate_queries")
    )]
    pub queries: Vec<String>,

    /// Providers to ask; all configured providers when omitted
    pub platforms: Option<Vec<LlmProvider>>,
}

fn validate_queries(queries: &[String]) -> Result<(), ValidationError> {
    if queries.iter().any(|q| q.trim().is_empty() || q.len() > 500) {
        let mut err = ValidationError::new("queries");
        err.message = Some("Queries must be non-empty and at most 500 characters".into());
        return Err(err);
    }
    Ok(())
}

impl SentimentRequestDto {
    /// Requested platforms without duplicates, in request order
    pub fn platforms(&self) -> Vec<LlmProvider> {
        let requested = self
            .platforms
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| LlmProvider::ALL.to_vec());

        let mut unique = Vec::with_capacity(requested.len());
        for platform in requested {
            if !unique.contains(&platform) {
                unique.push(platform);
            }
        }
        unique
    }
}

/// Result of one `(query, platform)` call
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlatformOutcome {
    Ok { analysis: SentimentAnalysis },
    Failed { error: String },
}

impl PlatformOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, PlatformOutcome::Ok { .. })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SentimentItemDto {
    pub query: String,
    pub platform: LlmProvider,
    #[serde(flatten)]
    pub outcome: PlatformOutcome,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct SentimentSummaryDto {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Mean score over successful items
    pub average_score: Option<f64>,
}

impl SentimentSummaryDto {
    pub fn from_items(items: &[SentimentItemDto]) -> Self {
        let scores: Vec<f64> = items
            .iter()
            .filter_map(|item| match &item.outcome {
                PlatformOutcome::Ok { analysis } if analysis.is_llm_success => Some(analysis.score),
                _ => None,
            })
            .collect();
        let succeeded = items.iter().filter(|item| item.outcome.is_ok()).count();

        Self {
            total: items.len(),
            succeeded,
            failed: items.len() - succeeded,
            average_score: (!scores.is_empty())
                .then(|| scores.iter().sum::<f64>() / scores.len() as f64),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SentimentReportDto {
    pub items: Vec<SentimentItemDto>,
    pub summary: SentimentSummaryDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_default_and_dedup() {
        let mut dto = SentimentRequestDto {
            queries: vec!["Nike".to_string()],
            platforms: None,
        };
        assert_eq!(dto.platforms(), LlmProvider::ALL.to_vec());

        dto.platforms = Some(vec![LlmProvider::Grok, LlmProvider::Grok]);
        assert_eq!(dto.platforms(), vec![LlmProvider::Grok]);
    }

    #[test]
    fn test_blank_query_rejected() {
        let dto = SentimentRequestDto {
            queries: vec!["Nike".to_string(), "  ".to_string()],
            platforms: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let item = SentimentItemDto {
            query: "Nike".to_string(),
            platform: LlmProvider::Grok,
            outcome: PlatformOutcome::Failed {
                error: "timeout".to_string(),
            },
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "timeout");
        assert_eq!(value["platform"], "grok");
    }
}
