use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::demographics::dtos::{
    CreateDemographicDto, DemographicResponseDto, UpdateDemographicDto,
};
use crate::features::demographics::services::DemographicService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[utoipa::path(
    get,
    path = "/api/admin/demographics",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Demographics retrieved successfully", body = ApiResponse<Vec<DemographicResponseDto>>),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "demographics",
    security(("bearer_auth" = []))
)]
pub async fn list_demographics(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DemographicService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DemographicResponseDto>>>> {
    let (items, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/demographics/{id}",
    params(("id" = String, Path, description = "Demographic slug")),
    responses(
        (status = 200, description = "Demographic retrieved successfully", body = ApiResponse<DemographicResponseDto>),
        (status = 404, description = "Demographic not found")
    ),
    tag = "demographics",
    security(("bearer_auth" = []))
)]
pub async fn get_demographic(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DemographicService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DemographicResponseDto>>> {
    let item = service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/demographics",
    request_body = CreateDemographicDto,
    responses(
        (status = 201, description = "Demographic created successfully", body = ApiResponse<DemographicResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Demographic id already exists")
    ),
    tag = "demographics",
    security(("bearer_auth" = []))
)]
pub async fn create_demographic(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DemographicService>>,
    AppJson(dto): AppJson<CreateDemographicDto>,
) -> Result<(StatusCode, Json<ApiResponse<DemographicResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/demographics/{id}",
    params(("id" = String, Path, description = "Demographic slug")),
    request_body = UpdateDemographicDto,
    responses(
        (status = 200, description = "Demographic updated successfully", body = ApiResponse<DemographicResponseDto>),
        (status = 404, description = "Demographic not found")
    ),
    tag = "demographics",
    security(("bearer_auth" = []))
)]
pub async fn update_demographic(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DemographicService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateDemographicDto>,
) -> Result<Json<ApiResponse<DemographicResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/demographics/{id}",
    params(("id" = String, Path, description = "Demographic slug")),
    responses(
        (status = 200, description = "Demographic deleted successfully"),
        (status = 404, description = "Demographic not found")
    ),
    tag = "demographics",
    security(("bearer_auth" = []))
)]
pub async fn delete_demographic(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DemographicService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
