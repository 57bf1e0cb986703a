pub mod legal_analysis_dto;

pub use legal_analysis_dto::{AnalyzeContentDto, LegalAnalysisResponseDto, LegalHistoryItemDto};
