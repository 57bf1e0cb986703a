use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::llm::{check_range, LlmResponse};

pub const AD_SCORE_MIN: f64 = 0.0;
pub const AD_SCORE_MAX: f64 = 10.0;
const NEUTRAL_AD_SCORE: f64 = 5.0;

fn default_true() -> bool {
    true
}

/// Structured critique of an advertisement, scored 0-10
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct AdAnalysis {
    /// Overall effectiveness, 0-10
    pub overall_score: f64,

    // Sub-scores the model leaves out stay null; the overall score is the only required one
    /// Visual appeal and composition, 0-10
    #[serde(default)]
    pub visual_appeal: Option<f64>,
    /// How clearly the message lands, 0-10
    #[serde(default)]
    pub message_clarity: Option<f64>,
    /// Fit with the brand's identity, 0-10
    #[serde(default)]
    pub brand_consistency: Option<f64>,
    /// Fit with the intended audience, 0-10
    #[serde(default)]
    pub audience_fit: Option<f64>,
    /// Strength of the call to action, 0-10
    #[serde(default)]
    pub call_to_action: Option<f64>,

    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// Two or three sentence verdict
    #[serde(default)]
    pub summary: String,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub is_llm_success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub llm_error_message: Option<String>,
}

impl AdAnalysis {
    fn scores(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("overall_score", Some(self.overall_score)),
            ("visual_appeal", self.visual_appeal),
            ("message_clarity", self.message_clarity),
            ("brand_consistency", self.brand_consistency),
            ("audience_fit", self.audience_fit),
            ("call_to_action", self.call_to_action),
        ]
    }
}

impl LlmResponse for AdAnalysis {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
        self.overall_score = NEUTRAL_AD_SCORE;
        self.visual_appeal = Some(NEUTRAL_AD_SCORE);
        self.message_clarity = Some(NEUTRAL_AD_SCORE);
        self.brand_consistency = Some(NEUTRAL_AD_SCORE);
        self.audience_fit = Some(NEUTRAL_AD_SCORE);
        self.call_to_action = Some(NEUTRAL_AD_SCORE);
        self.summary = "Analysis unavailable: the model response could not be read.".to_string();
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }

    fn validate(&self) -> Result<(), String> {
        self.scores()
            .iter()
            .filter_map(|(field, value)| value.map(|v| (*field, v)))
            .try_for_each(|(field, value)| check_range(field, value, AD_SCORE_MIN, AD_SCORE_MAX))
    }
}

/// Stored analysis row
#[derive(Debug, Clone, FromRow)]
pub struct AdAnalysisRecord {
    pub id: Uuid,
    pub image_ref: String,
    pub brand_id: Option<String>,
    pub target_audience: Option<String>,
    pub overall_score: f64,
    pub result: serde_json::Value,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::{parse_response, parse_with_fallback};

    fn sample() -> AdAnalysis {
        AdAnalysis {
            overall_score: 7.5,
            visual_appeal: Some(8.0),
            message_clarity: Some(6.5),
            brand_consistency: Some(9.0),
            audience_fit: Some(7.0),
            call_to_action: Some(4.0),
            strengths: vec!["Striking colour palette".to_string()],
            weaknesses: vec!["Tagline is hard to read".to_string()],
            recommendations: vec!["Increase tagline contrast".to_string()],
            summary: "Strong visuals, weak CTA.".to_string(),
            is_llm_success: true,
            llm_error_message: None,
        }
    }

    #[test]
    fn test_well_formed_analysis_survives_serialize_and_parse() {
        let original = sample();
        let text = serde_json::to_string(&original).unwrap();
        let parsed: AdAnalysis = parse_with_fallback(&text);
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_garbage_yields_neutral_fallback() {
        let parsed: AdAnalysis = parse_with_fallback("I can't see the image, sorry.");

        assert!(!parsed.is_success());
        assert!(parsed.llm_error_message.is_some());
        assert_eq!(parsed.overall_score, 5.0);
        assert_eq!(parsed.call_to_action, Some(5.0));
        assert!(parsed.strengths.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_out_of_range_score_fails_strict_parse() {
        let mut analysis = sample();
        analysis.visual_appeal = Some(85.0);
        let text = serde_json::to_string(&analysis).unwrap();

        let err = parse_response::<AdAnalysis>(&text, true).unwrap_err();
        assert!(err.contains("visual_appeal"));
    }

    #[test]
    fn test_schema_omits_bookkeeping_fields() {
        let schema = AdAnalysis::json_schema_string();
        assert!(schema.contains("overall_score"));
        assert!(!schema.contains("is_llm_success"));
    }

    #[test]
    fn test_missing_sub_scores_keep_real_review() {
        let text = r#"{"overall_score": 6.5, "visual_appeal": 8,
                       "strengths": ["Clean layout"], "summary": "Solid."}"#;
        let parsed: AdAnalysis = parse_with_fallback(text);

        assert!(parsed.is_success());
        assert_eq!(parsed.overall_score, 6.5);
        assert_eq!(parsed.visual_appeal, Some(8.0));
        assert_eq!(parsed.call_to_action, None);
        assert_eq!(parsed.strengths, vec!["Clean layout".to_string()]);
    }

    #[test]
    fn test_missing_overall_score_still_falls_back() {
        let parsed: AdAnalysis = parse_with_fallback(r#"{"visual_appeal": 8}"#);
        assert!(!parsed.is_success());
    }
}
