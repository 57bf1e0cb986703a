use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::adcritic::dtos::{AdAnalysisResponseDto, AnalyzeAdDto};
use crate::features::adcritic::services::AdCriticService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Score an advertisement image
///
/// Fallback results (`analysis.is_llm_success = false`) are returned but not stored.
#[utoipa::path(
    post,
    path = "/api/adcritic/analyze",
    request_body = AnalyzeAdDto,
    responses(
        (status = 200, description = "Analysis completed", body = ApiResponse<AdAnalysisResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Brand not found"),
        (status = 502, description = "LLM provider error or unreadable output in strict mode")
    ),
    tag = "adcritic"
)]
pub async fn analyze_ad(
    State(service): State<Arc<AdCriticService>>,
    AppJson(dto): AppJson<AnalyzeAdDto>,
) -> Result<Json<ApiResponse<AdAnalysisResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.analyze(dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/adcritic/analyses",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Analysis history", body = ApiResponse<Vec<AdAnalysisResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "adcritic",
    security(("bearer_auth" = []))
)]
pub async fn list_ad_analyses(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdCriticService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<AdAnalysisResponseDto>>>> {
    let (items, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/adcritic/analyses/{id}",
    params(("id" = Uuid, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "Analysis", body = ApiResponse<AdAnalysisResponseDto>),
        (status = 404, description = "Analysis not found")
    ),
    tag = "adcritic",
    security(("bearer_auth" = []))
)]
pub async fn get_ad_analysis(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdCriticService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdAnalysisResponseDto>>> {
    let item = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}
