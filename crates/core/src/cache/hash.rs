//! Cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a fetch URL.
///
/// A deterministic one-way digest; collisions are acceptable in theory
/// (the key is not security-sensitive) but distinct URLs map to distinct
/// keys in practice.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
