pub mod constants;
pub mod hash;
pub mod llm;
pub mod prompts;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
