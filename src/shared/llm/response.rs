use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait for LLM response types that support fallback behavior
///
/// Types implementing this trait can be parsed with graceful degradation -
/// if parsing fails, a default fallback value is returned with error information.
pub trait LlmResponse: DeserializeOwned + Default + JsonSchema {
    /// Mark this response as a fallback due to parsing failure
    fn mark_as_fallback(&mut self, error_message: String);

    /// Check if this response was successfully parsed
    fn is_success(&self) -> bool;

    /// Contract checks beyond "is valid JSON", e.g. score ranges.
    /// A response that fails here is treated like one that failed to parse.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Generate JSON schema string for use in LLM prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Check that an optional numeric score lies within `[min, max]`.
pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), String> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range("score", 0.0, 0.0, 10.0).is_ok());
        assert!(check_range("score", 10.0, 0.0, 10.0).is_ok());
        assert!(check_range("score", 10.5, 0.0, 10.0).is_err());
        assert!(check_range("score", -1.0, 0.0, 10.0).is_err());
        assert!(check_range("score", f64::NAN, 0.0, 10.0).is_err());
    }
}
