use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::brandchat::PersonaPromptBuilder;
use crate::features::prompts::{handlers, services::PromptService};

/// Prompt template management (super admin only)
pub fn admin_routes(service: Arc<PromptService>, builder: Arc<PersonaPromptBuilder>) -> Router {
    let crud = Router::new()
        .route(
            "/api/admin/system-prompts",
            get(handlers::list_prompts).post(handlers::create_prompt),
        )
        .route(
            "/api/admin/system-prompts/{id}",
            get(handlers::get_prompt)
                .put(handlers::update_prompt)
                .delete(handlers::delete_prompt),
        )
        .with_state(service);

    let preview = Router::new()
        .route(
            "/api/admin/system-prompts/preview",
            post(handlers::preview_prompt),
        )
        .with_state(builder);

    crud.merge(preview)
}
