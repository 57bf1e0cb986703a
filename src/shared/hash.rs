use sha2::{Digest, Sha256};

use crate::shared::constants::CONTENT_HASH_LEN;

/// Hex SHA-256 of `content`, truncated to [`CONTENT_HASH_LEN`] characters
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(CONTENT_HASH_LEN);
    hash
}
