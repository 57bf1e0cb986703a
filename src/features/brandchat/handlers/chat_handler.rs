use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::brandchat::dtos::{ChatRequestDto, ChatResponseDto};
use crate::features::brandchat::services::BrandChatService;
use crate::shared::types::ApiResponse;

/// Chat with a persona about a brand
///
/// The persona, brand and system templates are composed into the system
/// message; only the trailing part of the conversation is forwarded.
#[utoipa::path(
    post,
    path = "/api/brandchat/chat",
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Persona reply", body = ApiResponse<ChatResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Persona or brand not found"),
        (status = 502, description = "LLM provider error")
    ),
    tag = "brandchat"
)]
pub async fn chat(
    State(service): State<Arc<BrandChatService>>,
    AppJson(dto): AppJson<ChatRequestDto>,
) -> Result<Json<ApiResponse<ChatResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.chat(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}
