use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::legal_rules::dtos::{
    LegalRuleQueryParams, LegalRuleResponseDto, UpsertLegalRuleDto,
};
use crate::features::legal_rules::services::LegalRuleService;
use crate::shared::types::{ApiResponse, Meta};

/// List legal compliance rules
#[utoipa::path(
    get,
    path = "/api/admin/legal-rules",
    params(LegalRuleQueryParams),
    responses(
        (status = 200, description = "Rules retrieved successfully", body = ApiResponse<Vec<LegalRuleResponseDto>>),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "legal-rules",
    security(("bearer_auth" = []))
)]
pub async fn list_legal_rules(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalRuleService>>,
    Query(params): Query<LegalRuleQueryParams>,
) -> Result<Json<ApiResponse<Vec<LegalRuleResponseDto>>>> {
    let (rules, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(rules),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/legal-rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule retrieved successfully", body = ApiResponse<LegalRuleResponseDto>),
        (status = 404, description = "Rule not found")
    ),
    tag = "legal-rules",
    security(("bearer_auth" = []))
)]
pub async fn get_legal_rule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalRuleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LegalRuleResponseDto>>> {
    let rule = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(rule), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/legal-rules",
    request_body = UpsertLegalRuleDto,
    responses(
        (status = 201, description = "Rule created successfully", body = ApiResponse<LegalRuleResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Rule name already exists")
    ),
    tag = "legal-rules",
    security(("bearer_auth" = []))
)]
pub async fn create_legal_rule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalRuleService>>,
    AppJson(dto): AppJson<UpsertLegalRuleDto>,
) -> Result<(StatusCode, Json<ApiResponse<LegalRuleResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rule = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(rule), None, None)),
    ))
}

/// Replace a rule. Changing any rule invalidates cached legal analyses.
#[utoipa::path(
    put,
    path = "/api/admin/legal-rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    request_body = UpsertLegalRuleDto,
    responses(
        (status = 200, description = "Rule updated successfully", body = ApiResponse<LegalRuleResponseDto>),
        (status = 404, description = "Rule not found"),
        (status = 409, description = "Rule name already exists")
    ),
    tag = "legal-rules",
    security(("bearer_auth" = []))
)]
pub async fn update_legal_rule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalRuleService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertLegalRuleDto>,
) -> Result<Json<ApiResponse<LegalRuleResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rule = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(rule), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/legal-rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule deleted successfully"),
        (status = 404, description = "Rule not found")
    ),
    tag = "legal-rules",
    security(("bearer_auth" = []))
)]
pub async fn delete_legal_rule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LegalRuleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Legal rule deleted".to_string()),
        None,
    )))
}
