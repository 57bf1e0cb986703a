pub mod chat_dto;

pub use chat_dto::{ChatHistoryMessage, ChatRequestDto, ChatResponseDto};
