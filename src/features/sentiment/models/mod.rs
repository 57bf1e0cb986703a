mod sentiment;

pub use sentiment::{Sentiment, SentimentAnalysis};
