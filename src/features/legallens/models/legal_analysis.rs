use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::legal_rules::models::RuleSeverity;
use crate::shared::llm::{check_range, LlmResponse};

const LEGAL_SCORE_MIN: f64 = 0.0;
const LEGAL_SCORE_MAX: f64 = 100.0;
const NEUTRAL_LEGAL_SCORE: f64 = 50.0;

fn default_true() -> bool {
    true
}

/// A passage that breaks one of the compliance rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Violation {
    /// Name of the rule that is violated
    pub rule: String,
    #[serde(default, deserialize_with = "RuleSeverity::deserialize_lenient")]
    pub severity: RuleSeverity,
    /// Offending passage, quoted from the content
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub explanation: String,
    /// Compliant rewording
    #[serde(default)]
    pub suggestion: String,
}

/// Compliance review of a piece of marketing copy, scored 0-100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct LegalAnalysis {
    /// 100 means fully compliant
    pub overall_score: f64,
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Borderline issues that are not outright violations
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub summary: String,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub is_llm_success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub llm_error_message: Option<String>,
}

impl LegalAnalysis {
    /// Most severe violation found, if any
    pub fn worst_severity(&self) -> Option<RuleSeverity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

impl LlmResponse for LegalAnalysis {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
        self.overall_score = NEUTRAL_LEGAL_SCORE;
        self.warnings = vec!["Automated compliance review was unavailable; review manually.".to_string()];
        self.summary = "Analysis unavailable: the model response could not be read.".to_string();
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }

    fn validate(&self) -> Result<(), String> {
        check_range(
            "overall_score",
            self.overall_score,
            LEGAL_SCORE_MIN,
            LEGAL_SCORE_MAX,
        )
    }
}

/// Row of `legal_analysis_history`
#[derive(Debug, Clone, FromRow)]
pub struct LegalAnalysisRecord {
    pub id: Uuid,
    pub content_hash: String,
    pub rules_fingerprint: String,
    pub content: String,
    pub content_type: Option<String>,
    pub overall_score: f64,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
