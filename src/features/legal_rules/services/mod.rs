pub mod legal_rule_service;

pub use legal_rule_service::{rules_fingerprint, LegalRuleService};
