use chrono::Utc;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::legal_rules::models::LegalRule;
use crate::features::legal_rules::services::{rules_fingerprint, LegalRuleService};
use crate::features::legallens::dtos::{
    AnalyzeContentDto, LegalAnalysisResponseDto, LegalHistoryItemDto,
};
use crate::features::legallens::models::LegalAnalysis;
use crate::features::legallens::services::{LegalHistoryStore, NewLegalAnalysis};
use crate::modules::llm::{ChatCompletion, ChatMessage, CompletionRequest, LlmProvider};
use crate::shared::hash::content_hash;
use crate::shared::llm::{parse_response, LlmResponse};
use crate::shared::types::PaginationQuery;

fn system_prompt(rules: &[LegalRule]) -> String {
    let mut prompt = String::from(
        "You are a marketing compliance reviewer. Check the content against the rules \
         below. Score overall compliance from 0 (unusable) to 100 (fully compliant), quote \
         the offending passage for every violation and suggest compliant wording.",
    );

    if rules.is_empty() {
        prompt.push_str("\n\nNo specific rules are configured; apply general advertising law.");
    } else {
        prompt.push_str("\n\nRules:");
        for rule in rules {
            prompt.push_str(&format!(
                "\n- [{}] {} ({}): {}",
                rule.severity().as_str(),
                rule.name,
                rule.category,
                rule.description
            ));
        }
    }

    prompt.push_str(&format!(
        "\n\nRespond with a single JSON object matching this schema:\n{}",
        LegalAnalysis::json_schema_string()
    ));
    prompt
}

fn user_prompt(dto: &AnalyzeContentDto) -> String {
    match dto.content_type.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(kind) => format!("Content type: {}\n\n{}", kind.trim(), dto.content),
        None => dto.content.clone(),
    }
}

/// LegalLens: compliance review with a content-hash result cache
pub struct LegalLensService {
    rules: Arc<LegalRuleService>,
    history: Arc<dyn LegalHistoryStore>,
    llm: Arc<dyn ChatCompletion>,
    strict_parsing: bool,
}

impl LegalLensService {
    pub fn new(
        rules: Arc<LegalRuleService>,
        history: Arc<dyn LegalHistoryStore>,
        llm: Arc<dyn ChatCompletion>,
        strict_parsing: bool,
    ) -> Self {
        Self {
            rules,
            history,
            llm,
            strict_parsing,
        }
    }

    pub async fn analyze(&self, dto: AnalyzeContentDto) -> Result<LegalAnalysisResponseDto> {
        let rules = self.rules.active_rules().await?;
        self.analyze_against(dto, &rules).await
    }

    /// Cached results only count when they were produced against the same rule set
    async fn analyze_against(
        &self,
        dto: AnalyzeContentDto,
        rules: &[LegalRule],
    ) -> Result<LegalAnalysisResponseDto> {
        let hash = content_hash(&dto.content);
        let fingerprint = rules_fingerprint(rules);

        if let Some(record) = self.history.find(&hash, &fingerprint).await? {
            let id = record.id;
            match LegalAnalysisResponseDto::from_record(record, true, rules.len()) {
                Ok(response) => {
                    tracing::debug!("Legal analysis cache hit for {}", hash);
                    return Ok(response);
                }
                Err(e) => tracing::warn!("Ignoring malformed cached analysis {}: {}", id, e),
            }
        }

        let request = CompletionRequest::new(
            LlmProvider::OpenAi,
            vec![
                ChatMessage::system(system_prompt(rules)),
                ChatMessage::user(user_prompt(&dto)),
            ],
        )
        .temperature(0.2)
        .json_response();

        let text = self.llm.complete(request).await?;
        let analysis: LegalAnalysis = parse_response(&text, self.strict_parsing).map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid legal analysis: {}", e))
        })?;

        if !analysis.is_success() {
            tracing::warn!(
                "Returning fallback legal analysis for {} without caching it: {}",
                hash,
                analysis.llm_error_message.as_deref().unwrap_or("unknown error")
            );
            return Ok(LegalAnalysisResponseDto {
                id: None,
                content_hash: hash,
                content_type: dto.content_type,
                cached: false,
                rules_checked: rules.len(),
                analysis,
                created_at: Utc::now(),
            });
        }

        let result = serde_json::to_value(&analysis)
            .map_err(|e| AppError::Internal(format!("Failed to serialize analysis: {}", e)))?;

        let record = self
            .history
            .insert(NewLegalAnalysis {
                content_hash: hash,
                rules_fingerprint: fingerprint,
                content: dto.content,
                content_type: dto.content_type,
                overall_score: analysis.overall_score,
                result,
            })
            .await?;

        tracing::info!(
            "Legal analysis {} stored (score {:.0}, {} violations)",
            record.id,
            analysis.overall_score,
            analysis.violations.len()
        );

        Ok(LegalAnalysisResponseDto {
            id: Some(record.id),
            content_hash: record.content_hash,
            content_type: record.content_type,
            cached: false,
            rules_checked: rules.len(),
            analysis,
            created_at: record.created_at,
        })
    }

    pub async fn history(
        &self,
        params: &PaginationQuery,
    ) -> Result<(Vec<LegalHistoryItemDto>, i64)> {
        let (records, total) = self.history.list(params).await?;

        let items = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                LegalHistoryItemDto::try_from(record)
                    .map_err(|e| tracing::warn!("Skipping malformed legal analysis {}: {}", id, e))
                    .ok()
            })
            .collect();

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::legallens::models::LegalAnalysisRecord;
    use crate::shared::test_helpers::{lazy_pool, ScriptedChat};
    use async_trait::async_trait;
    use fake::faker::lorem::en::Paragraph;
    use fake::Fake;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemoryHistory {
        rows: Mutex<Vec<LegalAnalysisRecord>>,
    }

    #[async_trait]
    impl LegalHistoryStore for MemoryHistory {
        async fn find(
            &self,
            content_hash: &str,
            rules_fingerprint: &str,
        ) -> Result<Option<LegalAnalysisRecord>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.content_hash == content_hash && r.rules_fingerprint == rules_fingerprint)
                .cloned())
        }

        async fn insert(&self, entry: NewLegalAnalysis) -> Result<LegalAnalysisRecord> {
            let record = LegalAnalysisRecord {
                id: Uuid::new_v4(),
                content_hash: entry.content_hash,
                rules_fingerprint: entry.rules_fingerprint,
                content: entry.content,
                content_type: entry.content_type,
                overall_score: entry.overall_score,
                result: entry.result,
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn list(
            &self,
            _params: &PaginationQuery,
        ) -> Result<(Vec<LegalAnalysisRecord>, i64)> {
            let rows = self.rows.lock().unwrap().clone();
            let total = rows.len() as i64;
            Ok((rows, total))
        }
    }

    const REVIEW: &str = r#"{
        "overall_score": 72,
        "violations": [{"rule": "No guaranteed results", "severity": "high",
                        "excerpt": "guaranteed", "explanation": "x", "suggestion": "y"}],
        "warnings": [],
        "recommendations": ["Add a disclaimer"],
        "summary": "Mostly fine."
    }"#;

    fn rule(name: &str) -> LegalRule {
        LegalRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "claims".to_string(),
            description: "Do not promise outcomes".to_string(),
            severity: "high".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(llm: Arc<ScriptedChat>, history: Arc<MemoryHistory>) -> LegalLensService {
        LegalLensService::new(
            Arc::new(LegalRuleService::new(lazy_pool())),
            history,
            llm,
            false,
        )
    }

    fn dto(content: &str) -> AnalyzeContentDto {
        AnalyzeContentDto {
            content: content.to_string(),
            content_type: Some("social_post".to_string()),
        }
    }

    #[tokio::test]
    async fn test_second_identical_request_is_cached() {
        let llm = Arc::new(ScriptedChat::replying(REVIEW));
        let history = Arc::new(MemoryHistory::default());
        let service = service(llm.clone(), history);
        let rules = vec![rule("No guaranteed results")];
        let content: String = Paragraph(3..5).fake();

        let first = service.analyze_against(dto(&content), &rules).await.unwrap();
        let second = service.analyze_against(dto(&content), &rules).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.id, second.id);
        assert_eq!(first.analysis.overall_score, second.analysis.overall_score);
        assert_eq!(first.analysis.violations, second.analysis.violations);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_rule_change_bypasses_cache() {
        let llm = Arc::new(ScriptedChat::replying(REVIEW));
        let service = service(llm.clone(), Arc::new(MemoryHistory::default()));
        let content = "Guaranteed weight loss in 7 days!";

        service
            .analyze_against(dto(content), &[rule("No guaranteed results")])
            .await
            .unwrap();
        let again = service
            .analyze_against(
                dto(content),
                &[rule("No guaranteed results"), rule("Disclose sponsorships")],
            )
            .await
            .unwrap();

        assert!(!again.cached);
        assert_eq!(again.rules_checked, 2);
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let llm = Arc::new(ScriptedChat::replying("Sorry, I can't help with that."));
        let history = Arc::new(MemoryHistory::default());
        let service = service(llm.clone(), history.clone());
        let rules = vec![rule("No guaranteed results")];

        let first = service.analyze_against(dto("Buy now"), &rules).await.unwrap();
        let second = service.analyze_against(dto("Buy now"), &rules).await.unwrap();

        assert!(first.id.is_none());
        assert!(!first.analysis.is_llm_success);
        assert!(!second.cached);
        assert!(history.rows.lock().unwrap().is_empty());
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_strict_mode_maps_garbage_to_bad_gateway() {
        let llm = Arc::new(ScriptedChat::replying("not json"));
        let service = LegalLensService::new(
            Arc::new(LegalRuleService::new(lazy_pool())),
            Arc::new(MemoryHistory::default()),
            llm,
            true,
        );

        let err = service
            .analyze_against(dto("Buy now"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[test]
    fn test_system_prompt_lists_rules() {
        let prompt = system_prompt(&[rule("No guaranteed results")]);
        assert!(prompt.contains("- [high] No guaranteed results (claims)"));
        assert!(prompt.contains("overall_score"));
    }
}
