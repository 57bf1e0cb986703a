use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::messages::ChatMessage;
use crate::core::config::LlmConfig;
use crate::core::error::{AppError, Result};

/// Chat Completions provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Grok,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 2] = [LlmProvider::OpenAi, LlmProvider::Grok];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Grok => "grok",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub provider: LlmProvider,
    /// Overrides the provider's default model
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON object response
    pub json_response: bool,
}

impl CompletionRequest {
    pub fn new(provider: LlmProvider, messages: Vec<ChatMessage>) -> Self {
        Self {
            provider,
            model: None,
            messages,
            temperature: None,
            max_tokens: None,
            json_response: false,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json_response(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Anything that can turn a [`CompletionRequest`] into reply text
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Clone)]
struct ProviderEndpoint {
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ProviderEndpoint {
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Shared HTTP client for both providers
pub struct LlmGateway {
    client: reqwest::Client,
    openai: ProviderEndpoint,
    grok: ProviderEndpoint,
}

impl LlmGateway {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            openai: ProviderEndpoint {
                base_url: config.openai_base_url.clone(),
                api_key: config.openai_api_key.clone(),
                model: config.openai_model.clone(),
            },
            grok: ProviderEndpoint {
                base_url: config.grok_base_url.clone(),
                api_key: config.grok_api_key.clone(),
                model: config.grok_model.clone(),
            },
        })
    }

    fn endpoint(&self, provider: LlmProvider) -> &ProviderEndpoint {
        match provider {
            LlmProvider::OpenAi => &self.openai,
            LlmProvider::Grok => &self.grok,
        }
    }

    pub fn is_configured(&self, provider: LlmProvider) -> bool {
        self.endpoint(provider).api_key.is_some()
    }

    async fn send(&self, request: CompletionRequest) -> Result<String> {
        let endpoint = self.endpoint(request.provider);
        let api_key = endpoint.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError(format!(
                "{} API key is not configured",
                request.provider
            ))
        })?;

        let model = request.model.as_deref().unwrap_or(&endpoint.model);
        let body = ChatCompletionBody {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            provider = %request.provider,
            model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(endpoint.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("{} request failed: {:?}", request.provider, e);
                AppError::ExternalServiceError(format!("{} request failed: {}", request.provider, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::warn!("{} returned status {}: {}", request.provider, status, message);
            return Err(AppError::ExternalServiceError(format!(
                "{} returned status {}: {}",
                request.provider, status, message
            )));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {:?}", request.provider, e);
            AppError::ExternalServiceError(format!(
                "Failed to parse {} response: {}",
                request.provider, e
            ))
        })?;

        extract_content(parsed).ok_or_else(|| {
            AppError::ExternalServiceError(format!("{} returned an empty reply", request.provider))
        })
    }
}

fn extract_content(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
}

#[async_trait]
impl ChatCompletion for LlmGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::llm::ChatMessage;
    use std::time::Duration;

    fn test_config() -> LlmConfig {
        LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: "https://api.openai.com/v1/".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_vision_model: "gpt-4o".to_string(),
            grok_api_key: None,
            grok_base_url: "https://api.x.ai/v1".to_string(),
            grok_model: "grok-3-mini".to_string(),
            request_timeout: Duration::from_secs(5),
            strict_parsing: false,
            chat_history_limit: 10,
        }
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&LlmProvider::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::from_str::<LlmProvider>("\"grok\"").unwrap(),
            LlmProvider::Grok
        );
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let gateway = LlmGateway::new(&test_config()).unwrap();
        assert_eq!(
            gateway.openai.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            gateway.grok.completions_url(),
            "https://api.x.ai/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_external_error() {
        let gateway = LlmGateway::new(&test_config()).unwrap();
        assert!(!gateway.is_configured(LlmProvider::Grok));

        let err = gateway
            .complete(CompletionRequest::new(
                LlmProvider::Grok,
                vec![ChatMessage::user("hi")],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[test]
    fn test_body_includes_json_response_format() {
        let messages = vec![ChatMessage::user("hi")];
        let body = ChatCompletionBody {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: Some(0.2),
            max_tokens: None,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_extract_content_rejects_blank_reply() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(extract_content(parsed).is_none());

        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Hello"}}]}"#).unwrap();
        assert_eq!(extract_content(parsed), Some("Hello".to_string()));
    }
}
