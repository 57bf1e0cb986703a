/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Number of hex characters kept from a SHA-256 content digest
pub const CONTENT_HASH_LEN: usize = 16;

/// Target id of the single system-level prompt template
pub const GLOBAL_TARGET_ID: &str = "global";
