use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::adcritic::dtos::{AdAnalysisResponseDto, AnalyzeAdDto};
use crate::features::adcritic::models::{AdAnalysis, AdAnalysisRecord};
use crate::features::brands::models::Brand;
use crate::features::brands::BrandService;
use crate::modules::llm::{ChatCompletion, ChatMessage, CompletionRequest, LlmProvider};
use crate::shared::hash::content_hash;
use crate::shared::llm::{parse_response, LlmResponse};
use crate::shared::types::PaginationQuery;

const MAX_IMAGE_REF_LEN: usize = 2048;

const AD_RECORD_COLUMNS: &str =
    "id, image_ref, brand_id, target_audience, overall_score, result, model, created_at";

fn system_prompt() -> String {
    format!(
        "You are a senior creative director reviewing advertisements. \
         Score each dimension from 0 to 10, be specific and actionable, and respond \
         with a single JSON object matching this schema:\n{}",
        AdAnalysis::json_schema_string()
    )
}

/// Instruction sent alongside the image
pub fn build_user_prompt(
    brand: Option<&Brand>,
    target_audience: Option<&str>,
    context: Option<&str>,
) -> String {
    let mut prompt = String::from("Analyze this advertisement.");

    if let Some(brand) = brand {
        prompt.push_str(&format!(
            "\n\nBrand: {} ({}). {}\nTone: {}\nValues: {}",
            brand.name, brand.industry, brand.description, brand.tone, brand.values
        ));
    }
    if let Some(audience) = target_audience.filter(|a| !a.trim().is_empty()) {
        prompt.push_str(&format!("\n\nTarget audience: {}", audience.trim()));
    }
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\n\nAdditional context: {}", context.trim()));
    }

    prompt
}

/// What gets stored for an image: the URL itself, or a digest for inline data URLs
pub fn image_reference(image_url: &str) -> String {
    match image_url.split_once(";base64,") {
        Some((mime, data)) if image_url.starts_with("data:") => {
            format!("{};sha256={}", mime, content_hash(data))
        }
        _ => image_url.chars().take(MAX_IMAGE_REF_LEN).collect(),
    }
}

pub struct AdCriticService {
    pool: PgPool,
    brands: Arc<BrandService>,
    llm: Arc<dyn ChatCompletion>,
    vision_model: String,
    strict_parsing: bool,
}

impl AdCriticService {
    pub fn new(
        pool: PgPool,
        brands: Arc<BrandService>,
        llm: Arc<dyn ChatCompletion>,
        vision_model: String,
        strict_parsing: bool,
    ) -> Self {
        Self {
            pool,
            brands,
            llm,
            vision_model,
            strict_parsing,
        }
    }

    pub async fn analyze(&self, dto: AnalyzeAdDto) -> Result<AdAnalysisResponseDto> {
        let brand = match dto.brand_id.as_deref() {
            Some(id) => Some(
                self.brands
                    .find(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", id)))?,
            ),
            None => None,
        };

        let user_prompt = build_user_prompt(
            brand.as_ref(),
            dto.target_audience.as_deref(),
            dto.context.as_deref(),
        );
        let request = CompletionRequest::new(
            LlmProvider::OpenAi,
            vec![
                ChatMessage::system(system_prompt()),
                ChatMessage::user_with_image(user_prompt, dto.image_url.as_str()),
            ],
        )
        .model(self.vision_model.as_str())
        .temperature(0.3)
        .json_response();

        let text = self.llm.complete(request).await?;
        let analysis: AdAnalysis = parse_response(&text, self.strict_parsing)
            .map_err(|e| AppError::ExternalServiceError(format!("Invalid ad analysis: {}", e)))?;

        if !analysis.is_success() {
            tracing::warn!(
                "Returning fallback ad analysis without storing it: {}",
                analysis.llm_error_message.as_deref().unwrap_or("unknown error")
            );
            return Ok(AdAnalysisResponseDto {
                id: None,
                brand_id: dto.brand_id,
                target_audience: dto.target_audience,
                model: self.vision_model.clone(),
                analysis,
                created_at: Utc::now(),
            });
        }

        let result = serde_json::to_value(&analysis)
            .map_err(|e| AppError::Internal(format!("Failed to serialize analysis: {}", e)))?;

        let query = format!(
            r#"
            INSERT INTO ad_analyses (image_ref, brand_id, target_audience, overall_score, result, model)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            AD_RECORD_COLUMNS
        );
        let record = sqlx::query_as::<_, AdAnalysisRecord>(&query)
            .bind(image_reference(&dto.image_url))
            .bind(&dto.brand_id)
            .bind(&dto.target_audience)
            .bind(analysis.overall_score)
            .bind(&result)
            .bind(&self.vision_model)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store ad analysis: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Ad analysis {} stored (overall score {:.1})",
            record.id,
            analysis.overall_score
        );

        Ok(AdAnalysisResponseDto {
            id: Some(record.id),
            brand_id: record.brand_id,
            target_audience: record.target_audience,
            model: record.model,
            analysis,
            created_at: record.created_at,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<AdAnalysisResponseDto> {
        let query = format!("SELECT {} FROM ad_analyses WHERE id = $1", AD_RECORD_COLUMNS);
        let record = sqlx::query_as::<_, AdAnalysisRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ad analysis with id {} not found", id)))?;

        AdAnalysisResponseDto::try_from(record)
            .map_err(|e| AppError::Internal(format!("Stored ad analysis is malformed: {}", e)))
    }

    pub async fn list(
        &self,
        params: &PaginationQuery,
    ) -> Result<(Vec<AdAnalysisResponseDto>, i64)> {
        let search = params.search_pattern();
        let filter = "WHERE ($1::text IS NULL OR brand_id ILIKE $1 OR target_audience ILIKE $1)";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM ad_analyses {}", filter))
                .bind(&search)
                .fetch_one(&self.pool)
                .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM ad_analyses
            {}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            AD_RECORD_COLUMNS, filter
        );
        let records = sqlx::query_as::<_, AdAnalysisRecord>(&query)
            .bind(&search)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                AdAnalysisResponseDto::try_from(record)
                    .map_err(|e| tracing::warn!("Skipping malformed ad analysis {}: {}", id, e))
                    .ok()
            })
            .collect();

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::llm::{ChatRole, ContentPart, MessageContent};
    use crate::shared::test_helpers::{lazy_pool, ScriptedChat};

    const AD_URL: &str = "https://cdn.example.com/campaign/ad.jpg";

    fn service(llm: Arc<ScriptedChat>, strict: bool) -> AdCriticService {
        AdCriticService::new(
            lazy_pool(),
            Arc::new(BrandService::new(lazy_pool())),
            llm,
            "gpt-4o".to_string(),
            strict,
        )
    }

    fn dto() -> AnalyzeAdDto {
        AnalyzeAdDto {
            image_url: AD_URL.to_string(),
            brand_id: None,
            target_audience: Some("runners 20-35".to_string()),
            context: None,
        }
    }

    #[test]
    fn test_image_reference_digests_data_urls() {
        let reference = image_reference("data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==");
        assert!(reference.starts_with("data:image/png;sha256="));
        assert_eq!(reference.len(), "data:image/png;sha256=".len() + 16);
    }

    #[test]
    fn test_image_reference_keeps_urls() {
        let url = "https://cdn.example.com/campaign/ad.jpg";
        assert_eq!(image_reference(url), url);
    }

    #[test]
    fn test_user_prompt_includes_brand_and_audience() {
        let now = Utc::now();
        let brand = Brand {
            id: "nike".to_string(),
            name: "Nike".to_string(),
            description: "Athletic apparel".to_string(),
            tone: "bold, motivational".to_string(),
            values: "performance".to_string(),
            industry: "Sportswear".to_string(),
            created_at: now,
            updated_at: now,
        };

        let prompt = build_user_prompt(Some(&brand), Some("runners 20-35"), Some("  "));
        assert!(prompt.contains("Brand: Nike (Sportswear)"));
        assert!(prompt.contains("Target audience: runners 20-35"));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_system_prompt_embeds_schema() {
        assert!(system_prompt().contains("call_to_action"));
    }

    #[tokio::test]
    async fn test_fallback_is_returned_without_storing() {
        // The lazy pool cannot connect, so reaching the insert would fail the call
        let llm = Arc::new(ScriptedChat::replying("I can't see any image here."));
        let response = service(llm.clone(), false).analyze(dto()).await.unwrap();

        assert!(response.id.is_none());
        assert!(!response.analysis.is_llm_success);
        assert_eq!(response.analysis.overall_score, 5.0);
        assert_eq!(response.model, "gpt-4o");
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_strict_mode_maps_garbage_to_bad_gateway() {
        let llm = Arc::new(ScriptedChat::replying("I can't see any image here."));
        let err = service(llm, true).analyze(dto()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_out_of_range_scores() {
        let llm = Arc::new(ScriptedChat::replying(r#"{"overall_score": 42}"#));
        let err = service(llm, true).analyze(dto()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_request_carries_image_and_vision_model() {
        let llm = Arc::new(ScriptedChat::replying("not json"));
        service(llm.clone(), false).analyze(dto()).await.unwrap();

        let request = &llm.requests()[0];
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert!(request.json_response);
        assert_eq!(request.messages[0].role, ChatRole::System);

        let MessageContent::Parts(parts) = &request.messages[1].content else {
            panic!("expected text and image parts");
        };
        assert!(parts.iter().any(|p| matches!(
            p,
            ContentPart::ImageUrl { image_url } if image_url.url == AD_URL
        )));
        assert!(parts.iter().any(|p| matches!(
            p,
            ContentPart::Text { text } if text.contains("Target audience: runners 20-35")
        )));
    }
}
