use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::guards::RequireSuperAdmin;
use crate::features::seed::dtos::SeedReportDto;
use crate::features::seed::services::SeedService;
use crate::shared::types::ApiResponse;

/// Insert default brands, personas, legal rules and prompt templates
///
/// Rows that already exist are reported as `skipped`; individual insert
/// failures are reported as `failed` without aborting the run.
#[utoipa::path(
    post,
    path = "/api/admin/seed",
    responses(
        (status = 200, description = "Seed report", body = ApiResponse<SeedReportDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn seed_defaults(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(service): State<Arc<SeedService>>,
) -> Result<Json<ApiResponse<SeedReportDto>>> {
    tracing::info!("Seed requested by session {}", user.session_id);

    let report = service.seed().await?;
    let message = format!(
        "{} inserted, {} skipped, {} failed",
        report.inserted, report.skipped, report.failed
    );
    Ok(Json(ApiResponse::success(Some(report), Some(message), None)))
}
