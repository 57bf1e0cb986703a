use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::seed::{handlers, services::SeedService};

pub fn admin_routes(service: Arc<SeedService>) -> Router {
    Router::new()
        .route("/api/admin/seed", post(handlers::seed_defaults))
        .with_state(service)
}
