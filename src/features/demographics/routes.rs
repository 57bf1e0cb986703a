use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::demographics::{handlers, services::DemographicService};

/// Persona management (admin)
pub fn admin_routes(service: Arc<DemographicService>) -> Router {
    Router::new()
        .route(
            "/api/admin/demographics",
            get(handlers::list_demographics).post(handlers::create_demographic),
        )
        .route(
            "/api/admin/demographics/{id}",
            get(handlers::get_demographic)
                .put(handlers::update_demographic)
                .delete(handlers::delete_demographic),
        )
        .with_state(service)
}
