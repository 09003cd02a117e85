//! Content digests for change detection.

use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of `bytes`. Stable across runs and platforms.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
