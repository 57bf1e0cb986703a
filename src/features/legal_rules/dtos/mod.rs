pub mod legal_rule_dto;

pub use legal_rule_dto::{LegalRuleQueryParams, LegalRuleResponseDto, UpsertLegalRuleDto};
