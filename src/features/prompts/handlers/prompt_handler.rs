use axum::{extract::Path, extract::Query, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireSuperAdmin;
use crate::features::brandchat::PersonaPromptBuilder;
use crate::features::prompts::dtos::{
    PreviewPromptDto, PromptPreviewDto, PromptQueryParams, PromptResponseDto, UpsertPromptDto,
};
use crate::features::prompts::services::PromptService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a prompt template (super admin only)
#[utoipa::path(
    post,
    path = "/api/admin/system-prompts",
    request_body = UpsertPromptDto,
    responses(
        (status = 201, description = "Prompt created successfully", body = ApiResponse<PromptResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - super admin only"),
        (status = 409, description = "Active template for this type and target already exists")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_prompt(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<PromptService>>,
    AppJson(dto): AppJson<UpsertPromptDto>,
) -> Result<(StatusCode, Json<ApiResponse<PromptResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let prompt = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(prompt), None, None)),
    ))
}

/// Get a prompt by ID (super admin only)
#[utoipa::path(
    get,
    path = "/api/admin/system-prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "Prompt ID")
    ),
    responses(
        (status = 200, description = "Prompt retrieved successfully", body = ApiResponse<PromptResponseDto>),
        (status = 404, description = "Prompt not found"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_prompt(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<PromptService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromptResponseDto>>> {
    let prompt = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(prompt), None, None)))
}

/// List all prompts with pagination and filters (super admin only)
#[utoipa::path(
    get,
    path = "/api/admin/system-prompts",
    params(PromptQueryParams),
    responses(
        (status = 200, description = "Prompts retrieved successfully", body = ApiResponse<Vec<PromptResponseDto>>),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_prompts(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<PromptService>>,
    Query(params): Query<PromptQueryParams>,
) -> Result<Json<ApiResponse<Vec<PromptResponseDto>>>> {
    let (prompts, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(prompts),
        None,
        Some(Meta { total }),
    )))
}

/// Replace a prompt template (super admin only)
#[utoipa::path(
    put,
    path = "/api/admin/system-prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "Prompt ID")
    ),
    request_body = UpsertPromptDto,
    responses(
        (status = 200, description = "Prompt updated successfully", body = ApiResponse<PromptResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Prompt not found"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_prompt(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<PromptService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertPromptDto>,
) -> Result<Json<ApiResponse<PromptResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let prompt = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(prompt), None, None)))
}

/// Delete a prompt template (super admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/system-prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "Prompt ID")
    ),
    responses(
        (status = 200, description = "Prompt deleted successfully"),
        (status = 404, description = "Prompt not found"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_prompt(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<PromptService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// Preview the composed persona prompt without calling a model (super admin only)
#[utoipa::path(
    post,
    path = "/api/admin/system-prompts/preview",
    request_body = PreviewPromptDto,
    responses(
        (status = 200, description = "Composed prompt", body = ApiResponse<PromptPreviewDto>),
        (status = 404, description = "Persona or brand not found"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "prompts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn preview_prompt(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(builder): State<Arc<PersonaPromptBuilder>>,
    AppJson(dto): AppJson<PreviewPromptDto>,
) -> Result<Json<ApiResponse<PromptPreviewDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let built = builder
        .build(&dto.persona_id, &dto.brand_id, dto.variables)
        .await?;

    let preview = PromptPreviewDto {
        unresolved: built.composed.unresolved,
        prompt: built.composed.text,
        layers: built.composed.layers,
        variables: built
            .variables
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    };

    Ok(Json(ApiResponse::success(Some(preview), None, None)))
}
