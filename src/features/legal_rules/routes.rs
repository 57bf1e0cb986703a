use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::legal_rules::{handlers, services::LegalRuleService};

pub fn admin_routes(service: Arc<LegalRuleService>) -> Router {
    Router::new()
        .route(
            "/api/admin/legal-rules",
            get(handlers::list_legal_rules).post(handlers::create_legal_rule),
        )
        .route(
            "/api/admin/legal-rules/{id}",
            get(handlers::get_legal_rule)
                .put(handlers::update_legal_rule)
                .delete(handlers::delete_legal_rule),
        )
        .with_state(service)
}
