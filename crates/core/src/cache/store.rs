//! The file-backed cache store.

use std::path::{Component, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;

use super::hash::cache_key;

/// Errors from cache administration.
///
/// Only [`FileCache::clear`] reports errors; reads and writes degrade to
/// misses and no-ops instead.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configured cache directory failed the safety guard.
    #[error("suspicious cache directory: {0}")]
    UnsafePath(String),

    /// The cache directory could not be enumerated.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Content cache keyed by fetch URL, one flat file per entry.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache handle over the given directory.
    ///
    /// The directory is created lazily on first write; a handle over a
    /// missing or unwritable directory simply never produces hits.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    /// Store raw fetched content under its URL, best-effort.
    ///
    /// Failures (missing directory that cannot be created, unwritable
    /// store, full disk) are logged at debug level and discarded; a cache
    /// write never fails the enclosing request.
    pub async fn put(&self, url: &str, content: &[u8]) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::debug!(dir = %self.dir.display(), error = %e, "cache directory unavailable, skipping write");
            return;
        }

        let path = self.entry_path(url);
        match tokio::fs::write(&path, content).await {
            Ok(()) => tracing::debug!(url, entry = %path.display(), bytes = content.len(), "cached"),
            Err(e) => tracing::debug!(url, error = %e, "cache write failed, skipping"),
        }
    }

    /// Read the cached content for a URL if the entry exists and its
    /// last-write time is within `ttl` of now.
    ///
    /// Stale entries are reported as misses but left on disk; the next
    /// successful fetch overwrites them.
    pub async fn get(&self, url: &str, ttl: Duration) -> Option<Vec<u8>> {
        let path = self.entry_path(url);

        let modified = tokio::fs::metadata(&path).await.ok()?.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age > ttl {
            tracing::debug!(url, age_secs = age.as_secs(), ttl_secs = ttl.as_secs(), "cache entry stale");
            return None;
        }

        tokio::fs::read(&path).await.ok()
    }

    /// Delete every cache entry regardless of age and return the number
    /// successfully removed.
    ///
    /// Refuses to operate when the configured directory is empty, the
    /// filesystem root, or contains a parent-directory traversal token.
    /// This is a guard against misconfiguration, not a security boundary.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::UnsafePath` on a guard violation, or
    /// `CacheError::Io` if the directory cannot be enumerated. A missing
    /// directory counts as an empty cache, not an error.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        self.guard_dir()?;

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        tracing::info!(dir = %self.dir.display(), removed, "cache cleared");
        Ok(removed)
    }

    fn guard_dir(&self) -> Result<(), CacheError> {
        let display = self.dir.display().to_string();

        if self.dir.as_os_str().is_empty() {
            return Err(CacheError::UnsafePath(display));
        }
        if self.dir.is_absolute() && self.dir.parent().is_none() {
            return Err(CacheError::UnsafePath(display));
        }
        if self.dir.components().any(|c| c == Component::ParentDir) {
            return Err(CacheError::UnsafePath(display));
        }

        Ok(())
    }
}
