use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::brandchat::{handlers, services::BrandChatService};

pub fn routes(service: Arc<BrandChatService>) -> Router {
    Router::new()
        .route("/api/brandchat/chat", post(handlers::chat))
        .with_state(service)
}
