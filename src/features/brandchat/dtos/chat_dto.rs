use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::modules::llm::{ChatRole, LlmProvider};
use crate::shared::prompts::PromptType;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ChatHistoryMessage {
    pub role: ChatRole,

    #[validate(length(min = 1, max = 8000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequestDto {
    /// Demographic slug, e.g. "gen-z"
    #[validate(length(min = 1, max = 100))]
    pub persona_id: String,

    /// Brand slug, e.g. "apple"
    #[validate(length(min = 1, max = 100))]
    pub brand_id: String,

    /// Conversation so far, oldest first. Must end with a user message.
    #[validate(
        length(min = 1, message = "messages must not be empty"),
        nested,
        custom(function = "validate_history")
    )]
    pub messages: Vec<ChatHistoryMessage>,

    /// Defaults to OpenAI
    #[serde(default)]
    pub provider: Option<LlmProvider>,

    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
}

fn validate_history(messages: &[ChatHistoryMessage]) -> Result<(), ValidationError> {
    if messages.iter().any(|m| m.role == ChatRole::System) {
        let mut err = ValidationError::new("system_role");
        err.message = Some("system messages are composed server-side".into());
        return Err(err);
    }

    match messages.last() {
        Some(last) if last.role == ChatRole::User => Ok(()),
        Some(_) => {
            let mut err = ValidationError::new("last_message_role");
            err.message = Some("the last message must come from the user".into());
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponseDto {
    pub reply: String,
    pub persona_id: String,
    pub brand_id: String,
    pub provider: LlmProvider,
    /// Prompt layers that were found and used
    pub prompt_layers: Vec<PromptType>,
}
