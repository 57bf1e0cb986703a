mod legal_rule;

pub use legal_rule::{LegalRule, RuleSeverity};
