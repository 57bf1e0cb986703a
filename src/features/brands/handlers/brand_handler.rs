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
use crate::features::brands::dtos::{BrandResponseDto, CreateBrandDto, UpdateBrandDto};
use crate::features::brands::services::BrandService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List brands
#[utoipa::path(
    get,
    path = "/api/admin/brands",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Brands retrieved successfully", body = ApiResponse<Vec<BrandResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn list_brands(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BrandService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<BrandResponseDto>>>> {
    let (brands, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(brands),
        None,
        Some(Meta { total }),
    )))
}

/// Get a brand by slug id
#[utoipa::path(
    get,
    path = "/api/admin/brands/{id}",
    params(("id" = String, Path, description = "Brand slug")),
    responses(
        (status = 200, description = "Brand retrieved successfully", body = ApiResponse<BrandResponseDto>),
        (status = 404, description = "Brand not found")
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn get_brand(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BrandService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BrandResponseDto>>> {
    let brand = service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(Some(brand), None, None)))
}

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/admin/brands",
    request_body = CreateBrandDto,
    responses(
        (status = 201, description = "Brand created successfully", body = ApiResponse<BrandResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Brand id already exists")
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn create_brand(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BrandService>>,
    AppJson(dto): AppJson<CreateBrandDto>,
) -> Result<(StatusCode, Json<ApiResponse<BrandResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(brand),
            Some("Brand created".to_string()),
            None,
        )),
    ))
}

/// Replace a brand
#[utoipa::path(
    put,
    path = "/api/admin/brands/{id}",
    params(("id" = String, Path, description = "Brand slug")),
    request_body = UpdateBrandDto,
    responses(
        (status = 200, description = "Brand updated successfully", body = ApiResponse<BrandResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Brand not found")
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn update_brand(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BrandService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateBrandDto>,
) -> Result<Json<ApiResponse<BrandResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(Some(brand), None, None)))
}

/// Delete a brand
#[utoipa::path(
    delete,
    path = "/api/admin/brands/{id}",
    params(("id" = String, Path, description = "Brand slug")),
    responses(
        (status = 200, description = "Brand deleted successfully"),
        (status = 404, description = "Brand not found")
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn delete_brand(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BrandService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
