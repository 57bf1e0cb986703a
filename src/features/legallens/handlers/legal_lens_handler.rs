use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::legallens::dtos::{
    AnalyzeContentDto, LegalAnalysisResponseDto, LegalHistoryItemDto,
};
use crate::features::legallens::services::LegalLensService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Check marketing copy against the active compliance rules
///
/// Identical content reviewed against an unchanged rule set is served from
/// history with `cached: true`.
#[utoipa::path(
    post,
    path = "/api/legal/analyze",
    request_body = AnalyzeContentDto,
    responses(
        (status = 200, description = "Analysis completed", body = ApiResponse<LegalAnalysisResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "LLM provider error or unreadable output in strict mode")
    ),
    tag = "legal"
)]
pub async fn analyze_content(
    State(service): State<Arc<LegalLensService>>,
    AppJson(dto): AppJson<AnalyzeContentDto>,
) -> Result<Json<ApiResponse<LegalAnalysisResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.analyze(dto).await?;
    let message = result.cached.then(|| "Served from analysis history".to_string());
    Ok(Json(ApiResponse::success(Some(result), message, None)))
}

#[utoipa::path(
    get,
    path = "/api/legal/history",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Analysis history", body = ApiResponse<Vec<LegalHistoryItemDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "legal",
    security(("bearer_auth" = []))
)]
pub async fn list_legal_history(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalLensService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<LegalHistoryItemDto>>>> {
    let (items, total) = service.history(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}
