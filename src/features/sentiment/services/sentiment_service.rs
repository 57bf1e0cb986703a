use futures::future::join_all;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::sentiment::dtos::{
    PlatformOutcome, SentimentItemDto, SentimentReportDto, SentimentRequestDto,
    SentimentSummaryDto,
};
use crate::features::sentiment::models::SentimentAnalysis;
use crate::modules::llm::{ChatCompletion, ChatMessage, CompletionRequest, LlmProvider};
use crate::shared::llm::{parse_strict, LlmResponse};

fn system_prompt() -> String {
    format!(
        "You are a social listening analyst. Summarize how the public currently feels about \
         the topic you are given, using what you know from social media and the press. \
         Respond with a single JSON object matching this schema:\n{}",
        SentimentAnalysis::json_schema_string()
    )
}

/// Multi-platform sentiment fan-out
pub struct SentimentService {
    llm: Arc<dyn ChatCompletion>,
}

impl SentimentService {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm }
    }

    async fn ask(&self, query: String, platform: LlmProvider) -> SentimentItemDto {
        let request = CompletionRequest::new(
            platform,
            vec![
                ChatMessage::system(system_prompt()),
                ChatMessage::user(format!("Topic: {}", query)),
            ],
        )
        .temperature(0.3)
        .json_response();

        let outcome = match self.llm.complete(request).await {
            Ok(text) => match parse_strict::<SentimentAnalysis>(&text) {
                Ok(analysis) => PlatformOutcome::Ok { analysis },
                Err(e) => {
                    tracing::warn!("Unreadable {} sentiment for '{}': {}", platform, query, e);
                    PlatformOutcome::Failed { error: e }
                }
            },
            Err(e) => {
                tracing::warn!("{} sentiment request for '{}' failed: {}", platform, query, e);
                PlatformOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        SentimentItemDto {
            query,
            platform,
            outcome,
        }
    }

    /// Ask every platform about every query concurrently; one failure never sinks the batch
    pub async fn analyze(&self, dto: SentimentRequestDto) -> Result<SentimentReportDto> {
        let platforms = dto.platforms();
        let calls = dto.queries.iter().flat_map(|query| {
            platforms
                .iter()
                .map(move |platform| self.ask(query.trim().to_string(), *platform))
        });

        let items = join_all(calls).await;
        let summary = SentimentSummaryDto::from_items(&items);

        tracing::info!(
            "Sentiment fan-out finished: {}/{} succeeded",
            summary.succeeded,
            summary.total
        );

        Ok(SentimentReportDto { items, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::ScriptedChat;

    fn dto(queries: &[&str], platforms: Option<Vec<LlmProvider>>) -> SentimentRequestDto {
        SentimentRequestDto {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            platforms,
        }
    }

    #[tokio::test]
    async fn test_fan_out_covers_every_pair_in_order() {
        let llm = Arc::new(ScriptedChat::replying(
            r#"{"sentiment": "positive", "score": 0.6, "key_themes": ["design"], "summary": "Liked"}"#,
        ));
        let service = SentimentService::new(llm.clone());

        let report = service
            .analyze(dto(&["Apple", "Nike"], None))
            .await
            .unwrap();

        assert_eq!(llm.calls(), 4);
        assert_eq!(report.items.len(), 4);
        assert_eq!(report.items[0].query, "Apple");
        assert_eq!(report.items[0].platform, LlmProvider::OpenAi);
        assert_eq!(report.items[1].platform, LlmProvider::Grok);
        assert_eq!(report.items[3].query, "Nike");
        assert_eq!(report.summary.succeeded, 4);
        assert_eq!(report.summary.average_score, Some(0.6));
    }

    #[tokio::test]
    async fn test_partial_failures_are_counted() {
        let llm = Arc::new(ScriptedChat::new(|request| match request.provider {
            LlmProvider::OpenAi => Ok(r#"{"sentiment": "negative", "score": -0.4}"#.to_string()),
            LlmProvider::Grok => Err(AppError::ExternalServiceError(
                "grok API key is not configured".to_string(),
            )),
        }));
        let service = SentimentService::new(llm);

        let report = service
            .analyze(dto(&["Tesla", "Meta", "Shell"], None))
            .await
            .unwrap();

        let ok = report.items.iter().filter(|i| i.outcome.is_ok()).count();
        assert_eq!(report.summary.total, 6);
        assert_eq!(report.summary.succeeded, ok);
        assert_eq!(report.summary.failed, report.items.len() - ok);
        assert_eq!(report.summary.failed, 3);
        assert_eq!(report.summary.average_score, Some(-0.4));
    }

    #[tokio::test]
    async fn test_unreadable_reply_is_a_failed_item() {
        let llm = Arc::new(ScriptedChat::replying("People seem to like it overall."));
        let service = SentimentService::new(llm);

        let report = service
            .analyze(dto(&["Lego"], Some(vec![LlmProvider::OpenAi])))
            .await
            .unwrap();

        assert_eq!(report.summary.failed, 1);
        assert!(matches!(
            report.items[0].outcome,
            PlatformOutcome::Failed { .. }
        ));
        assert!(report.summary.average_score.is_none());
    }
}
