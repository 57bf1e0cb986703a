//! LLM response normalization: JSON extraction, repair and typed fallbacks.

mod parser;
mod response;

pub use parser::{parse_response, parse_strict, parse_with_fallback};
pub use response::{check_range, LlmResponse};
