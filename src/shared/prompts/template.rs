//! `{variable}` substitution for prompt templates.
//!
//! Templates are parsed once into a token list and rendered in a single pass.
//! Substituted values are emitted as opaque literals: a value that itself
//! contains `{brand_tone}` is never expanded again.

use std::collections::BTreeMap;

/// A parsed piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

/// Values available to a template, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptVariables(BTreeMap<String, String>);

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert only when `value` is present
    pub fn with_opt(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PromptVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a template into literals and `{identifier}` variables.
///
/// Braces that do not enclose an identifier (JSON examples, `{ }`) stay literal.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find('{') {
        let open = cursor + offset;
        let inner_start = open + 1;

        match source[inner_start..].find('}') {
            Some(len) if is_identifier(&source[inner_start..inner_start + len]) => {
                if literal_start < open {
                    tokens.push(Token::Literal(&source[literal_start..open]));
                }
                tokens.push(Token::Variable(&source[inner_start..inner_start + len]));
                cursor = inner_start + len + 1;
                literal_start = cursor;
            }
            _ => cursor = inner_start,
        }
    }

    if literal_start < source.len() {
        tokens.push(Token::Literal(&source[literal_start..]));
    }

    tokens
}

/// Render a template. Unknown variables are left verbatim as `{name}`.
pub fn render(source: &str, vars: &PromptVariables) -> String {
    let mut out = String::with_capacity(source.len());

    for token in tokenize(source) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Variable(name) => match vars.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            },
        }
    }

    out
}

/// Variable names referenced by a template, in order of first appearance
pub fn referenced_variables(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokenize(source) {
        if let Token::Variable(name) = token {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
