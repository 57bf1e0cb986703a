//! Chat Completions gateway for OpenAI and x.ai Grok.
//!
//! Both providers speak the same wire format; they differ only in base URL,
//! API key and default model.

mod gateway;
mod messages;

pub use gateway::{ChatCompletion, CompletionRequest, LlmGateway, LlmProvider};
pub use messages::{ChatMessage, ChatRole, ContentPart, ImageUrl, MessageContent};
