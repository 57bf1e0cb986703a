use std::sync::Arc;

use crate::core::error::Result;
use crate::features::brandchat::dtos::{ChatHistoryMessage, ChatRequestDto, ChatResponseDto};
use crate::features::brandchat::services::PersonaPromptBuilder;
use crate::modules::llm::{ChatCompletion, ChatMessage, CompletionRequest, LlmProvider};

const DEFAULT_CHAT_TEMPERATURE: f32 = 0.8;

/// Build the outgoing message list: composed system prompt, then the trailing
/// `history_limit` messages of the conversation.
pub fn build_messages(
    system_prompt: &str,
    history: &[ChatHistoryMessage],
    history_limit: usize,
) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(history_limit.max(1));
    let mut messages = Vec::with_capacity(history.len() - start + 1);

    if !system_prompt.trim().is_empty() {
        messages.push(ChatMessage::system(system_prompt));
    }

    messages.extend(
        history[start..]
            .iter()
            .map(|m| ChatMessage::text(m.role, m.content.clone())),
    );

    messages
}

pub struct BrandChatService {
    prompts: Arc<PersonaPromptBuilder>,
    llm: Arc<dyn ChatCompletion>,
    history_limit: usize,
}

impl BrandChatService {
    pub fn new(
        prompts: Arc<PersonaPromptBuilder>,
        llm: Arc<dyn ChatCompletion>,
        history_limit: usize,
    ) -> Self {
        Self {
            prompts,
            llm,
            history_limit,
        }
    }

    pub async fn chat(&self, dto: ChatRequestDto) -> Result<ChatResponseDto> {
        let prompt = self
            .prompts
            .build(&dto.persona_id, &dto.brand_id, std::iter::empty())
            .await?;

        if prompt.composed.is_empty() {
            tracing::warn!(
                persona_id = %dto.persona_id,
                brand_id = %dto.brand_id,
                "Composed prompt is empty, sending conversation without a system message"
            );
        }

        let provider = dto.provider.unwrap_or(LlmProvider::OpenAi);
        let messages = build_messages(&prompt.composed.text, &dto.messages, self.history_limit);

        tracing::debug!(
            "BrandChat {} x {} via {} ({} messages)",
            dto.persona_id,
            dto.brand_id,
            provider,
            messages.len()
        );

        let request = CompletionRequest::new(provider, messages)
            .temperature(dto.temperature.unwrap_or(DEFAULT_CHAT_TEMPERATURE));
        let reply = self.llm.complete(request).await?;

        Ok(ChatResponseDto {
            reply: reply.trim().to_string(),
            persona_id: dto.persona_id,
            brand_id: dto.brand_id,
            provider,
            prompt_layers: prompt.composed.layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::brandchat::services::persona_prompt::tests::builder;
    use crate::modules::llm::{ChatRole, MessageContent};
    use crate::shared::test_helpers::ScriptedChat;

    fn chat_request(persona_id: &str, history: Vec<ChatHistoryMessage>) -> ChatRequestDto {
        ChatRequestDto {
            persona_id: persona_id.to_string(),
            brand_id: "apple".to_string(),
            messages: history,
            provider: Some(LlmProvider::Grok),
            temperature: None,
        }
    }

    fn history(n: usize) -> Vec<ChatHistoryMessage> {
        (0..n)
            .map(|i| ChatHistoryMessage {
                role: if i % 2 == 0 {
                    ChatRole::User
                } else {
                    ChatRole::Assistant
                },
                content: format!("message {}", i),
            })
            .collect()
    }

    #[test]
    fn test_build_messages_keeps_trailing_history() {
        let messages = build_messages("You are a Gen Z Consumer.", &history(15), 10);

        assert_eq!(messages.len(), 11);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(
            messages[1].content,
            MessageContent::Text("message 5".to_string())
        );
        assert_eq!(
            messages[10].content,
            MessageContent::Text("message 14".to_string())
        );
    }

    #[test]
    fn test_build_messages_skips_empty_system_prompt() {
        let messages = build_messages("  ", &history(3), 10);
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.role != ChatRole::System));
    }

    #[test]
    fn test_build_messages_always_keeps_latest_message() {
        let messages = build_messages("sys", &history(5), 0);
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1].content,
            MessageContent::Text("message 4".to_string())
        );
    }

    #[tokio::test]
    async fn test_chat_sends_composed_prompt_then_trailing_history() {
        let llm = Arc::new(ScriptedChat::replying("  Honestly? Kinda overpriced.  "));
        let service = BrandChatService::new(Arc::new(builder()), llm.clone(), 4);

        let response = service.chat(chat_request("gen-z", history(7))).await.unwrap();

        assert_eq!(response.reply, "Honestly? Kinda overpriced.");
        assert_eq!(response.provider, LlmProvider::Grok);
        assert_eq!(response.prompt_layers.len(), 3);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].provider, LlmProvider::Grok);
        assert_eq!(requests[0].temperature, Some(DEFAULT_CHAT_TEMPERATURE));

        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(
            messages[0].content,
            MessageContent::Text(
                "Stay in character.\n\nYou are a Gen Z Consumer.\n\nYou are discussing Apple."
                    .to_string()
            )
        );
        let trailing: Vec<_> = messages[1..].iter().map(|m| m.content.clone()).collect();
        assert_eq!(
            trailing,
            (3..7)
                .map(|i| MessageContent::Text(format!("message {}", i)))
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_chat_unknown_persona_never_calls_llm() {
        let llm = Arc::new(ScriptedChat::replying("hi"));
        let service = BrandChatService::new(Arc::new(builder()), llm.clone(), 10);

        let err = service
            .chat(chat_request("boomer", history(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_propagates_provider_failure() {
        let llm = Arc::new(ScriptedChat::new(|_| {
            Err(AppError::ExternalServiceError("grok returned status 503".to_string()))
        }));
        let service = BrandChatService::new(Arc::new(builder()), llm, 10);

        let err = service.chat(chat_request("gen-z", history(1))).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
