pub mod chat_service;
pub mod persona_prompt;

pub use chat_service::BrandChatService;
pub use persona_prompt::{
    persona_variables, DbPersonaCatalog, PersonaCatalog, PersonaPrompt, PersonaPromptBuilder,
};
