use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::brands::{handlers, services::BrandService};

/// Brand management (admin)
pub fn admin_routes(service: Arc<BrandService>) -> Router {
    Router::new()
        .route(
            "/api/admin/brands",
            get(handlers::list_brands).post(handlers::create_brand),
        )
        .route(
            "/api/admin/brands/{id}",
            get(handlers::get_brand)
                .put(handlers::update_brand)
                .delete(handlers::delete_brand),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AdminRole;
    use crate::shared::test_helpers::{lazy_pool, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let app = with_auth(
            admin_routes(Arc::new(BrandService::new(lazy_pool()))),
            AdminRole::Admin,
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_brand_rejects_invalid_slug_before_database() {
        let response = server()
            .post("/api/admin/brands")
            .json(&json!({"id": "Not A Slug", "name": "Apple"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = server()
            .post("/api/admin/brands")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
