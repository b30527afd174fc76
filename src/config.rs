//! Configuration for the flat container
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{FeedError, Result};

/// Main configuration for a flat container instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the local feed (used by `FileStore`)
    /// Internal structure:
    ///   {root_dir}/
    ///     └── {container}/
    ///           └── {id}/
    ///                 ├── index.json
    ///                 └── {version}/
    ///                       ├── {id}.{version}.nupkg
    ///                       └── {id}.nuspec
    pub root_dir: PathBuf,

    /// First path segment of every key written by the flat container
    pub container: String,

    // -------------------------------------------------------------------------
    // Batch Configuration
    // -------------------------------------------------------------------------
    /// Max id groups processed concurrently within one batch call
    pub max_parallelism: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./feed"),
            container: "flatcontainer".to_string(),
            max_parallelism: 8,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can produce valid storage paths
    pub fn validate(&self) -> Result<()> {
        if self.container.is_empty() {
            return Err(FeedError::Config("container must not be empty".to_string()));
        }
        if self.container.contains('/') || self.container.contains('\\') {
            return Err(FeedError::Config(format!(
                "container '{}' must be a single path segment",
                self.container
            )));
        }
        if self.container == "." || self.container == ".." {
            return Err(FeedError::Config(format!(
                "container '{}' is not a valid segment",
                self.container
            )));
        }
        if self.max_parallelism == 0 {
            return Err(FeedError::Config(
                "max_parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the feed root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the container segment
    pub fn container(mut self, name: impl Into<String>) -> Self {
        self.config.container = name.into();
        self
    }

    /// Set the maximum number of id groups run in parallel
    pub fn max_parallelism(mut self, count: usize) -> Self {
        self.config.max_parallelism = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
