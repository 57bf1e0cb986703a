use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::sentiment::dtos::{SentimentReportDto, SentimentRequestDto};
use crate::features::sentiment::services::SentimentService;
use crate::shared::types::ApiResponse;

/// Gauge sentiment for each query on each platform
///
/// Per-item failures are reported inline with `status: "failed"`; the request
/// itself only fails on invalid input.
#[utoipa::path(
    post,
    path = "/api/sentiment/analyze",
    request_body = SentimentRequestDto,
    responses(
        (status = 200, description = "Fan-out completed", body = ApiResponse<SentimentReportDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sentiment"
)]
pub async fn analyze_sentiment(
    State(service): State<Arc<SentimentService>>,
    AppJson(dto): AppJson<SentimentRequestDto>,
) -> Result<Json<ApiResponse<SentimentReportDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.analyze(dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}
