use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::llm::{check_range, LlmResponse};

const SENTIMENT_SCORE_MIN: f64 = -1.0;
const SENTIMENT_SCORE_MAX: f64 = 1.0;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
    Mixed,
}

/// How one platform perceives a topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    /// -1 (very negative) to 1 (very positive)
    pub score: f64,
    #[serde(default)]
    pub key_themes: Vec<String>,
    #[serde(default)]
    pub summary: String,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub is_llm_success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub llm_error_message: Option<String>,
}

impl LlmResponse for SentimentAnalysis {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
        self.sentiment = Sentiment::Neutral;
        self.score = 0.0;
        self.summary = "Analysis unavailable: the model response could not be read.".to_string();
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }

    fn validate(&self) -> Result<(), String> {
        check_range("score", self.score, SENTIMENT_SCORE_MIN, SENTIMENT_SCORE_MAX)
    }
}
