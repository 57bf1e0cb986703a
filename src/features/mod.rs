pub mod adcritic;
pub mod auth;
pub mod brandchat;
pub mod brands;
pub mod demographics;
pub mod legal_rules;
pub mod legallens;
pub mod prompts;
pub mod seed;
pub mod sentiment;
