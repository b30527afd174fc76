//! Shared state for one flat container
//!
//! Bundles the storage backend, key derivation, configuration and the
//! cancellation token. Every storage call goes through here so cancellation
//! is honored at call boundaries.

use std::sync::Arc;

use bytes::Bytes;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{Storage, StoragePath};

use super::FlatContainerPaths;

/// Storage, paths and cancellation shared by every component
pub struct FeedContext {
    store: Arc<dyn Storage>,
    paths: FlatContainerPaths,
    token: CancellationToken,
    config: Config,
}

impl FeedContext {
    /// Create a context after validating the config
    pub fn new(config: Config, store: Arc<dyn Storage>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            paths: FlatContainerPaths::new(config.container.clone()),
            store,
            token: CancellationToken::new(),
            config,
        })
    }

    /// Replace the cancellation token
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn paths(&self) -> &FlatContainerPaths {
        &self.paths
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn Storage> {
        &self.store
    }

    // =========================================================================
    // Storage Calls
    // =========================================================================

    pub fn exists(&self, path: &StoragePath) -> Result<bool> {
        self.token.check()?;
        self.store.exists(path)
    }

    pub fn read(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        self.token.check()?;
        self.store.read(path)
    }

    pub fn read_json(&self, path: &StoragePath) -> Result<Option<serde_json::Value>> {
        self.token.check()?;
        self.store.read_json(path)
    }

    pub fn write(&self, path: &StoragePath, data: Bytes) -> Result<()> {
        self.token.check()?;
        tracing::debug!("Writing {} ({} bytes)", path, data.len());
        self.store.write(path, data)
    }

    pub fn delete(&self, path: &StoragePath) -> Result<()> {
        self.token.check()?;
        tracing::debug!("Deleting {}", path);
        self.store.delete(path)
    }
}
