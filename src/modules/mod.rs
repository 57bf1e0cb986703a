//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients for the Chat Completions providers.

pub mod llm;
