pub mod sentiment_handler;

pub use sentiment_handler::*;
