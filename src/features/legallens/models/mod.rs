mod legal_analysis;

pub use legal_analysis::{LegalAnalysis, LegalAnalysisRecord, Violation};
