use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (require a session token)
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(handlers::get_me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::core::middleware::auth_middleware;
    use crate::features::auth::JwtValidator;
    use crate::features::prompts::PromptService;
    use crate::features::seed::{routes as seed_routes, SeedService};
    use crate::shared::test_helpers::lazy_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn app() -> Router {
        let config = AuthConfig {
            jwt_secret: "router-test-secret-long-enough-for-hs256".to_string(),
            admin_password: Some("admin-pass".to_string()),
            superadmin_password: Some("super-pass".to_string()),
            token_ttl: Duration::from_secs(600),
        };
        let validator = Arc::new(JwtValidator::new(&config.jwt_secret, config.token_ttl));
        let auth_service = Arc::new(AuthService::new(&config, Arc::clone(&validator)).unwrap());

        let prompts = Arc::new(PromptService::new(lazy_pool(), Duration::from_secs(60)));
        let seed = Arc::new(SeedService::new(lazy_pool(), prompts));

        let protected = protected_routes()
            .merge(seed_routes::admin_routes(seed))
            .route_layer(axum::middleware::from_fn_with_state(
                validator,
                auth_middleware,
            ));

        Router::new()
            .merge(public_routes(auth_service))
            .merge(protected)
    }

    async fn login(server: &TestServer, password: &str) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "password": password }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_login_then_me() {
        let server = TestServer::new(app()).unwrap();
        let token = login(&server, "admin-pass").await;

        let response = server
            .get("/api/auth/me")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn test_wrong_password_unauthorized() {
        let server = TestServer::new(app()).unwrap();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "password": "elevateai2024" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let server = TestServer::new(app()).unwrap();

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/admin/seed")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_token_cannot_seed() {
        let server = TestServer::new(app()).unwrap();
        let token = login(&server, "admin-pass").await;

        server
            .post("/api/admin/seed")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let server = TestServer::new(app()).unwrap();
        let mut token = login(&server, "super-pass").await;
        token.push('x');

        server
            .get("/api/auth/me")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
