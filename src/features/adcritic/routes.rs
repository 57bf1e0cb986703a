use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::adcritic::{handlers, services::AdCriticService};

pub fn public_routes(service: Arc<AdCriticService>) -> Router {
    Router::new()
        .route("/api/adcritic/analyze", post(handlers::analyze_ad))
        .with_state(service)
}

/// Analysis history (admin)
pub fn admin_routes(service: Arc<AdCriticService>) -> Router {
    Router::new()
        .route("/api/adcritic/analyses", get(handlers::list_ad_analyses))
        .route("/api/adcritic/analyses/{id}", get(handlers::get_ad_analysis))
        .with_state(service)
}
