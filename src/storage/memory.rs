//! In-memory storage backend

use std::collections::BTreeMap;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::{Storage, StoragePath};

/// In-memory blob store
///
/// ## Concurrency:
/// - `blobs`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - Every operation holds the lock for one map access only
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<StoragePath, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// All stored paths in key order (for testing and debugging)
    pub fn paths(&self) -> Vec<StoragePath> {
        self.blobs.read().keys().cloned().collect()
    }
}

impl Storage for MemoryStore {
    fn exists(&self, path: &StoragePath) -> Result<bool> {
        Ok(self.blobs.read().contains_key(path))
    }

    fn read(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        Ok(self.blobs.read().get(path).cloned())
    }

    fn write(&self, path: &StoragePath, data: Bytes) -> Result<()> {
        self.blobs.write().insert(path.clone(), data);
        Ok(())
    }

    fn delete(&self, path: &StoragePath) -> Result<()> {
        self.blobs.write().remove(path);
        Ok(())
    }
}
