pub mod legal_rule_handler;

pub use legal_rule_handler::*;
