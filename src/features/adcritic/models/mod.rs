mod ad_analysis;

pub use ad_analysis::{AdAnalysis, AdAnalysisRecord};
