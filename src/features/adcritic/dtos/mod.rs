pub mod ad_analysis_dto;

pub use ad_analysis_dto::{AdAnalysisResponseDto, AnalyzeAdDto};
