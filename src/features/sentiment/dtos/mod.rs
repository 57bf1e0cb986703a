pub mod sentiment_dto;

pub use sentiment_dto::{
    PlatformOutcome, SentimentItemDto, SentimentReportDto, SentimentRequestDto, SentimentSummaryDto,
};
