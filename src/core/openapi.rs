use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::adcritic::{
    dtos as adcritic_dtos, handlers as adcritic_handlers, models as adcritic_models,
};
use crate::features::auth;
use crate::features::brandchat::{dtos as brandchat_dtos, handlers as brandchat_handlers};
use crate::features::brands::{dtos as brands_dtos, handlers as brands_handlers};
use crate::features::demographics::{dtos as demographics_dtos, handlers as demographics_handlers};
use crate::features::legal_rules::{
    dtos as legal_rules_dtos, handlers as legal_rules_handlers, models as legal_rules_models,
};
use crate::features::legallens::{
    dtos as legallens_dtos, handlers as legallens_handlers, models as legallens_models,
};
use crate::features::prompts::{dtos as prompts_dtos, handlers as prompts_handlers};
use crate::features::seed::{dtos as seed_dtos, handlers as seed_handlers};
use crate::features::sentiment::{
    dtos as sentiment_dtos, handlers as sentiment_handlers, models as sentiment_models,
};
use crate::modules::llm::{ChatRole, LlmProvider};
use crate::shared::prompts::PromptType;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::get_me,
        // BrandChat
        brandchat_handlers::chat,
        // AdCritic
        adcritic_handlers::analyze_ad,
        adcritic_handlers::list_ad_analyses,
        adcritic_handlers::get_ad_analysis,
        // LegalLens
        legallens_handlers::analyze_content,
        legallens_handlers::list_legal_history,
        // Sentiment
        sentiment_handlers::analyze_sentiment,
        // Brands (Admin)
        brands_handlers::list_brands,
        brands_handlers::get_brand,
        brands_handlers::create_brand,
        brands_handlers::update_brand,
        brands_handlers::delete_brand,
        // Demographics (Admin)
        demographics_handlers::list_demographics,
        demographics_handlers::get_demographic,
        demographics_handlers::create_demographic,
        demographics_handlers::update_demographic,
        demographics_handlers::delete_demographic,
        // Legal rules (Admin)
        legal_rules_handlers::list_legal_rules,
        legal_rules_handlers::get_legal_rule,
        legal_rules_handlers::create_legal_rule,
        legal_rules_handlers::update_legal_rule,
        legal_rules_handlers::delete_legal_rule,
        // Prompts (Super Admin)
        prompts_handlers::create_prompt,
        prompts_handlers::get_prompt,
        prompts_handlers::list_prompts,
        prompts_handlers::update_prompt,
        prompts_handlers::delete_prompt,
        prompts_handlers::preview_prompt,
        // Seed (Super Admin)
        seed_handlers::seed_defaults,
    ),
    components(
        schemas(
            Meta,
            ChatRole,
            LlmProvider,
            PromptType,
            // Auth
            auth::model::AdminRole,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // BrandChat
            brandchat_dtos::ChatHistoryMessage,
            brandchat_dtos::ChatRequestDto,
            brandchat_dtos::ChatResponseDto,
            ApiResponse<brandchat_dtos::ChatResponseDto>,
            // AdCritic
            adcritic_models::AdAnalysis,
            adcritic_dtos::AnalyzeAdDto,
            adcritic_dtos::AdAnalysisResponseDto,
            ApiResponse<adcritic_dtos::AdAnalysisResponseDto>,
            ApiResponse<Vec<adcritic_dtos::AdAnalysisResponseDto>>,
            // LegalLens
            legallens_models::Violation,
            legallens_models::LegalAnalysis,
            legallens_dtos::AnalyzeContentDto,
            legallens_dtos::LegalAnalysisResponseDto,
            legallens_dtos::LegalHistoryItemDto,
            ApiResponse<legallens_dtos::LegalAnalysisResponseDto>,
            ApiResponse<Vec<legallens_dtos::LegalHistoryItemDto>>,
            // Sentiment
            sentiment_models::Sentiment,
            sentiment_models::SentimentAnalysis,
            sentiment_dtos::SentimentRequestDto,
            sentiment_dtos::PlatformOutcome,
            sentiment_dtos::SentimentItemDto,
            sentiment_dtos::SentimentSummaryDto,
            sentiment_dtos::SentimentReportDto,
            ApiResponse<sentiment_dtos::SentimentReportDto>,
            // Brands
            brands_dtos::CreateBrandDto,
            brands_dtos::UpdateBrandDto,
            brands_dtos::BrandResponseDto,
            ApiResponse<brands_dtos::BrandResponseDto>,
            ApiResponse<Vec<brands_dtos::BrandResponseDto>>,
            // Demographics
            demographics_dtos::CreateDemographicDto,
            demographics_dtos::UpdateDemographicDto,
            demographics_dtos::DemographicResponseDto,
            ApiResponse<demographics_dtos::DemographicResponseDto>,
            ApiResponse<Vec<demographics_dtos::DemographicResponseDto>>,
            // Legal rules
            legal_rules_models::RuleSeverity,
            legal_rules_dtos::UpsertLegalRuleDto,
            legal_rules_dtos::LegalRuleResponseDto,
            ApiResponse<legal_rules_dtos::LegalRuleResponseDto>,
            ApiResponse<Vec<legal_rules_dtos::LegalRuleResponseDto>>,
            // Prompts
            prompts_dtos::UpsertPromptDto,
            prompts_dtos::PromptResponseDto,
            prompts_dtos::PreviewPromptDto,
            prompts_dtos::PromptPreviewDto,
            ApiResponse<prompts_dtos::PromptResponseDto>,
            ApiResponse<Vec<prompts_dtos::PromptResponseDto>>,
            ApiResponse<prompts_dtos::PromptPreviewDto>,
            // Seed
            seed_dtos::SeedStatus,
            seed_dtos::SeedEntryDto,
            seed_dtos::SeedReportDto,
            ApiResponse<seed_dtos::SeedReportDto>,
        )
    ),
    tags(
        (name = "auth", description = "Admin session login"),
        (name = "brandchat", description = "Persona role-play chat about a brand"),
        (name = "adcritic", description = "Advertisement image scoring"),
        (name = "legal", description = "Marketing copy compliance review"),
        (name = "sentiment", description = "Multi-platform sentiment fan-out"),
        (name = "brands", description = "Brand catalog (admin)"),
        (name = "demographics", description = "Persona catalog (admin)"),
        (name = "legal-rules", description = "Compliance rules (admin)"),
        (name = "prompts", description = "Prompt templates (super admin only)"),
        (name = "admin", description = "Maintenance endpoints (super admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "ElevateAI API",
        version = "0.1.0",
        description = "API documentation for ElevateAI",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
