//! Storage key derivation
//!
//! Every key is a pure function of (id, version, file name), fully
//! lower-cased, in the fixed order `container/id/version/file`.

use crate::error::Result;
use crate::package::{PackageId, PackageIdentity, MANIFEST_EXTENSION};
use crate::storage::StoragePath;

/// File name of the per-id version index
pub const INDEX_FILE_NAME: &str = "index.json";

/// Extension of the archive blob
pub const ARCHIVE_EXTENSION: &str = ".nupkg";

/// Derives storage keys under one container
#[derive(Debug, Clone)]
pub struct FlatContainerPaths {
    container: String,
}

impl FlatContainerPaths {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// `{container}/{id}/index.json`
    pub fn index(&self, id: &PackageId) -> Result<StoragePath> {
        Self::lowered(format!("{}/{}/{}", self.container, id.normalized(), INDEX_FILE_NAME))
    }

    /// `{container}/{id}/{version}/{id}.{version}.nupkg`
    pub fn archive(&self, identity: &PackageIdentity) -> Result<StoragePath> {
        self.entry(identity, &Self::archive_file_name(identity))
    }

    /// `{container}/{id}/{version}/{id}.nuspec`
    pub fn manifest(&self, identity: &PackageIdentity) -> Result<StoragePath> {
        self.entry(identity, &Self::manifest_file_name(&identity.id))
    }

    /// `{container}/{id}/{version}/{file_path}`
    ///
    /// `file_path` may contain `/` for entries nested inside the archive.
    pub fn entry(&self, identity: &PackageIdentity, file_path: &str) -> Result<StoragePath> {
        Self::lowered(format!(
            "{}/{}/{}/{}",
            self.container,
            identity.id.normalized(),
            identity.version.to_identity_string(),
            file_path
        ))
    }

    /// `{id}.{version}.nupkg`, lower-cased
    pub fn archive_file_name(identity: &PackageIdentity) -> String {
        format!(
            "{}.{}{}",
            identity.id.normalized(),
            identity.version.to_identity_string(),
            ARCHIVE_EXTENSION
        )
        .to_lowercase()
    }

    /// `{id}.nuspec`, lower-cased
    pub fn manifest_file_name(id: &PackageId) -> String {
        format!("{}{}", id.normalized(), MANIFEST_EXTENSION)
    }

    fn lowered(path: String) -> Result<StoragePath> {
        StoragePath::new(path.to_lowercase())
    }
}
