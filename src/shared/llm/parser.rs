use lazy_static::lazy_static;
use regex::Regex;
use std::time::{Duration, Instant};

use super::LlmResponse;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Regex for JavaScript string concatenation ("str1" + "str2")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Upper bound on how long an llm_json repair may take before its result is discarded
const JSON_REPAIR_TIMEOUT: Duration = Duration::from_secs(5);

/// Extract JSON string from text (handles multiple formats)
///
/// Tries in order:
/// 1. JSON in markdown code block: ```json ... ```
/// 2. Generic markdown code block: ``` ... ```
/// 3. Plain JSON starting with {
/// 4. JSON embedded anywhere in text (first { to last })
pub fn extract_json_string(text: &str) -> Result<String, String> {
    if text.contains("```json") {
        return text
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| "Failed to extract JSON from markdown code block".to_string());
    }

    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        // Skip optional language identifier on the same line
        if let Some(newline_offset) = text[block_start..].find('\n') {
            let json_start = block_start + newline_offset + 1;
            if let Some(end_offset) = text[json_start..].find("```") {
                return Ok(text[json_start..json_start + end_offset].trim().to_string());
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;

    let end = text
        .rfind('}')
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err("Invalid JSON boundaries in response".to_string())
    }
}

/// Fix trailing commas in JSON (common LLM mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Merge JavaScript string concatenation, which is invalid in JSON
///
/// `"str1" + "str2"` becomes `"str1str2"`.
pub fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

fn apply_quick_fixes(json_str: &str) -> String {
    let fixed = fix_js_string_concatenation(json_str);
    fix_trailing_commas(&fixed)
}

/// Attempt to repair JSON with the llm_json crate.
///
/// Returns None if repair fails, panics, or exceeds `JSON_REPAIR_TIMEOUT`.
fn repair_json_with_timeout(json_str: &str) -> Option<String> {
    let start = Instant::now();

    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    if start.elapsed() > JSON_REPAIR_TIMEOUT {
        tracing::warn!("JSON repair took longer than timeout");
        return None;
    }

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

/// Deserialize and run the type's contract checks
fn decode<T: LlmResponse>(json_str: &str) -> Result<T, String> {
    let parsed: T = serde_json::from_str(json_str).map_err(|e| e.to_string())?;
    parsed.validate()?;
    Ok(parsed)
}

/// Parse text as the target type, failing closed.
///
/// Pipeline:
/// 1. Strict parse of the whole text
/// 2. Extract the JSON span (code fence, or first `{` to last `}`) and parse
/// 3. Parse after quick fixes (trailing commas, string concatenation)
/// 4. Parse after an llm_json repair pass
///
/// Every successful decode must also pass `LlmResponse::validate`.
pub fn parse_strict<T>(text: &str) -> Result<T, String>
where
    T: LlmResponse,
{
    let mut last_error = match decode::<T>(text.trim()) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };

    let json_str = extract_json_string(text)?;

    tracing::debug!(
        "Extracted JSON (first 500 chars): {}",
        json_str.chars().take(500).collect::<String>()
    );

    match decode::<T>(&json_str) {
        Ok(parsed) => {
            tracing::debug!("JSON parsed after extraction");
            return Ok(parsed);
        }
        Err(e) => last_error = e,
    }

    let fixed_json = apply_quick_fixes(&json_str);
    match decode::<T>(&fixed_json) {
        Ok(parsed) => {
            tracing::debug!("JSON parsed after quick fixes");
            return Ok(parsed);
        }
        Err(e) => last_error = e,
    }

    if let Some(repaired) = repair_json_with_timeout(&json_str) {
        match decode::<T>(&repaired) {
            Ok(parsed) => {
                tracing::debug!("JSON parsed after llm_json repair");
                return Ok(parsed);
            }
            Err(e) => last_error = e,
        }
    }

    Err(format!(
        "Failed to parse model output ({}). Original: {}",
        last_error,
        json_str.chars().take(200).collect::<String>()
    ))
}

/// Parse LLM response text with graceful fallback
///
/// If every strategy in [`parse_strict`] fails, returns `T::default()` marked
/// as a fallback. Callers must check `is_success()` before persisting.
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match parse_strict::<T>(text) {
        Ok(parsed) => parsed,
        Err(error_msg) => {
            tracing::warn!("LLM response parsing failed, using fallback: {}", error_msg);
            let mut fallback = T::default();
            fallback.mark_as_fallback(error_msg);
            fallback
        }
    }
}

/// Parse according to the configured mode: fail closed when `strict`,
/// otherwise fall back to the type's default object.
pub fn parse_response<T>(text: &str, strict: bool) -> Result<T, String>
where
    T: LlmResponse,
{
    if strict {
        parse_strict(text)
    } else {
        Ok(parse_with_fallback(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::check_range;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    fn default_true() -> bool {
        true
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Scorecard {
        pub score: f64,
        #[serde(default)]
        pub strengths: Vec<String>,
        pub summary: Option<String>,

        #[serde(default = "default_true")]
        #[schemars(skip)]
        pub is_llm_success: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[schemars(skip)]
        pub llm_error_message: Option<String>,
    }

    impl LlmResponse for Scorecard {
        fn mark_as_fallback(&mut self, error_message: String) {
            self.is_llm_success = false;
            self.llm_error_message = Some(error_message);
            self.score = 5.0;
        }

        fn is_success(&self) -> bool {
            self.is_llm_success
        }

        fn validate(&self) -> Result<(), String> {
            check_range("score", self.score, 0.0, 10.0)
        }
    }

    // ==================== extract_json_string ====================

    #[test]
    fn test_extract_json_string_with_json_code_block() {
        let response = r#"Here is the analysis:

```json
{
    "score": 7,
    "strengths": ["bold"]
}
```

Hope that helps."#;

        let json = extract_json_string(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("\"score\""));
    }

    #[test]
    fn test_extract_json_string_with_generic_code_block() {
        let response = "```\n{\"score\": 7}\n```";
        assert_eq!(extract_json_string(response).unwrap(), "{\"score\": 7}");
    }

    #[test]
    fn test_extract_json_string_embedded() {
        let response = "Sure! {\"score\": 4, \"strengths\": []} Let me know.";
        assert_eq!(
            extract_json_string(response).unwrap(),
            r#"{"score": 4, "strengths": []}"#
        );
    }

    #[test]
    fn test_extract_json_string_no_json() {
        assert!(extract_json_string("No JSON here at all!").is_err());
    }

    #[test]
    fn test_extract_json_string_reversed_braces() {
        assert!(extract_json_string("} nothing {").is_err());
    }

    // ==================== quick fixes ====================

    #[test]
    fn test_fix_trailing_commas() {
        assert_eq!(
            fix_trailing_commas(r#"{"name": "John", "age": 30,}"#),
            r#"{"name": "John", "age": 30}"#
        );
        assert_eq!(
            fix_trailing_commas(r#"{"items": [1, 2, 3,]}"#),
            r#"{"items": [1, 2, 3]}"#
        );
        assert_eq!(
            fix_trailing_commas(r#"{"obj": {"nested": true,},}"#),
            r#"{"obj": {"nested": true}}"#
        );
    }

    #[test]
    fn test_fix_js_string_concatenation() {
        assert_eq!(
            fix_js_string_concatenation(r#"{"text": "hello" + "world"}"#),
            r#"{"text": "helloworld"}"#
        );
        assert_eq!(
            fix_js_string_concatenation(r#"{"msg": "a"   +   "b" + "c"}"#),
            r#"{"msg": "abc"}"#
        );
    }

    // ==================== parsing ====================

    #[test]
    fn test_parse_strict_plain_json() {
        let result: Scorecard =
            parse_strict(r#"{"score": 8, "strengths": ["clear CTA"], "summary": "ok"}"#).unwrap();
        assert!(result.is_success());
        assert_eq!(result.score, 8.0);
        assert_eq!(result.strengths, vec!["clear CTA".to_string()]);
    }

    #[test]
    fn test_parse_strict_with_surrounding_prose() {
        let result: Scorecard =
            parse_strict("Here you go: {\"score\": 6} -- end of analysis").unwrap();
        assert_eq!(result.score, 6.0);
    }

    #[test]
    fn test_parse_strict_with_trailing_comma() {
        let result: Scorecard = parse_strict(r#"{"score": 3, "strengths": ["a",],}"#).unwrap();
        assert_eq!(result.strengths, vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_strict_rejects_out_of_range() {
        let result = parse_strict::<Scorecard>(r#"{"score": 42}"#);
        let error = result.unwrap_err();
        assert!(error.contains("score must be between"));
    }

    #[test]
    fn test_parse_strict_rejects_garbage() {
        assert!(parse_strict::<Scorecard>("I cannot analyze this image.").is_err());
    }

    #[test]
    fn test_parse_with_fallback_garbage_returns_default() {
        let result: Scorecard = parse_with_fallback("I cannot analyze this image.");
        assert!(!result.is_success());
        assert!(result.llm_error_message.is_some());
        assert_eq!(result.score, 5.0);
        assert!(result.strengths.is_empty());
    }

    #[test]
    fn test_parse_with_fallback_partial_json_does_not_panic() {
        let result: Scorecard = parse_with_fallback(r#"{"score": 7, "summary": }"#);
        assert!(result.is_success() || result.llm_error_message.is_some());
    }

    #[test]
    fn test_parse_response_modes() {
        assert!(parse_response::<Scorecard>("garbage", true).is_err());

        let lenient = parse_response::<Scorecard>("garbage", false).unwrap();
        assert!(!lenient.is_success());
    }

    #[test]
    fn test_serialized_result_parses_back_unchanged() {
        let original = Scorecard {
            score: 7.5,
            strengths: vec!["color".to_string(), "layout".to_string()],
            summary: Some("Strong visual hierarchy".to_string()),
            is_llm_success: true,
            llm_error_message: None,
        };

        let text = serde_json::to_string(&original).unwrap();
        let parsed: Scorecard = parse_strict(&text).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_json_schema_string_skips_internal_fields() {
        let schema = Scorecard::json_schema_string();
        assert!(schema.contains("score"));
        assert!(schema.contains("strengths"));
        assert!(!schema.contains("is_llm_success"));
        assert!(!schema.contains("llm_error_message"));
    }
}
