//! Prompt template management.
//!
//! Templates use `{variable}` placeholders and are stored per layer
//! (`system`, `persona`, `brand`). The [`PromptComposer`] stitches the
//! three layers together for persona role-play.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::{render, PromptVariables};
//!
//! let vars = PromptVariables::new().with("brand_name", "Apple");
//! let prompt = render("Talk about {brand_name}.", &vars);
//! ```

pub mod composer;
pub mod store;
pub mod template;

pub use composer::{ComposedPrompt, PromptComposer};
pub use store::{
    normalize_target_id, FallbackTemplateStore, InMemoryTemplateStore, PromptType,
    TemplateError, TemplateFileEntry, TemplateStore,
};
pub use template::{referenced_variables, render, PromptVariables};
