//! File-backed cache for fetched page contents.
//!
//! One flat file per distinct fetch URL, named by a SHA-256 digest of the
//! URL. Freshness is decided at read time from the file's mtime against a
//! caller-supplied TTL, so the same entry can be reinterpreted under a
//! different TTL if the definition changes across restarts.
//!
//! - Writes are best-effort and never fail a request
//! - Reads miss on absent or stale entries (stale files are left in place)
//! - Clear deletes every entry unconditionally and reports the count

pub mod hash;
pub mod store;

pub use store::{CacheError, FileCache};
