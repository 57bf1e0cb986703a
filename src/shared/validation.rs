use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for slug ids (brands, demographics)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "apple", "gen-z", "millennial-parents"
    /// - Invalid: "-apple", "apple-", "gen--z", "Apple", "gen_z"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
