//! Storage Module
//!
//! Blob storage backends addressed by path-like keys.
//!
//! ## Responsibilities
//! - Existence checks, whole-blob reads and writes, idempotent deletes
//! - Path validation shared by every backend
//! - No multi-key transactions: callers sequence writes themselves
//!
//! ## Key Format
//! ```text
//! {container}/{id}/index.json
//! {container}/{id}/{version}/{id}.{version}.nupkg
//! {container}/{id}/{version}/{entry name}
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{FeedError, Result};

// =============================================================================
// StoragePath
// =============================================================================

/// A validated relative key: `/`-separated, no empty, `.` or `..` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();

        if path.is_empty() || path.contains('\\') {
            return Err(FeedError::InvalidPath(path));
        }

        let valid = path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if !valid {
            return Err(FeedError::InvalidPath(path));
        }

        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// File name (last segment)
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Storage Trait
// =============================================================================

/// A blob storage backend
///
/// Implementations might be:
/// - In-memory map ([`MemoryStore`])
/// - Local directory ([`FileStore`])
/// - Remote blob store (user-provided)
///
/// Errors are surfaced as-is; retries and timeouts belong to the backend.
pub trait Storage: Send + Sync {
    /// Check whether a blob exists
    fn exists(&self, path: &StoragePath) -> Result<bool>;

    /// Read a whole blob, `None` if absent
    fn read(&self, path: &StoragePath) -> Result<Option<Bytes>>;

    /// Replace the whole content of a blob, creating it if needed
    fn write(&self, path: &StoragePath, data: Bytes) -> Result<()>;

    /// Delete a blob (no-op if absent)
    fn delete(&self, path: &StoragePath) -> Result<()>;

    /// Read a blob as JSON
    ///
    /// Returns `None` when the blob is absent or is not JSON at all.
    fn read_json(&self, path: &StoragePath) -> Result<Option<serde_json::Value>> {
        let Some(bytes) = self.read(path)? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unparsable JSON at {}: {}", path, e);
                Ok(None)
            }
        }
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn exists(&self, path: &StoragePath) -> Result<bool> {
        (**self).exists(path)
    }

    fn read(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        (**self).read(path)
    }

    fn write(&self, path: &StoragePath, data: Bytes) -> Result<()> {
        (**self).write(path, data)
    }

    fn delete(&self, path: &StoragePath) -> Result<()> {
        (**self).delete(path)
    }

    fn read_json(&self, path: &StoragePath) -> Result<Option<serde_json::Value>> {
        (**self).read_json(path)
    }
}
