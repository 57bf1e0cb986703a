pub mod history_store;
pub mod legal_lens_service;

pub use history_store::{LegalHistoryStore, NewLegalAnalysis, PgLegalHistoryStore};
pub use legal_lens_service::LegalLensService;
