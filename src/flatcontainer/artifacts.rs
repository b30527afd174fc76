//! Archive and manifest blobs for one package identity

use crate::archive::{PackageArchive, ZipPackage};
use crate::error::{FeedError, Result};
use crate::package::{PackageIdentity, PackageInput};

use super::{FeedContext, FlatContainerPaths};

/// Places and removes the artifacts of single packages
pub struct ArtifactWriter<'a> {
    context: &'a FeedContext,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(context: &'a FeedContext) -> Self {
        Self { context }
    }

    /// Write the archive blob and the manifest extracted from it
    ///
    /// The manifest entry is `{id}.nuspec` at the archive root, matched
    /// case-insensitively. It is located before anything is written, so an
    /// archive without one leaves no blobs behind.
    pub fn write(&self, input: &PackageInput) -> Result<()> {
        let identity = &input.identity;
        let paths = self.context.paths();

        // Step 1: Locate the manifest
        let manifest_name = FlatContainerPaths::manifest_file_name(&identity.id);
        let mut archive = ZipPackage::open(input.archive.clone())?;

        let entry = archive.find_entry(&manifest_name)?.ok_or_else(|| {
            FeedError::DataFormat(format!(
                "unable to find '{}' in the archive of {}",
                manifest_name, identity
            ))
        })?;
        let manifest = archive.extract(&entry)?.ok_or_else(|| {
            FeedError::DataFormat(format!(
                "unable to read '{}' from the archive of {}",
                entry, identity
            ))
        })?;

        // Step 2: Archive blob
        self.context
            .write(&paths.archive(identity)?, input.archive.clone())?;

        // Step 3: Manifest blob
        self.context.write(&paths.manifest(identity)?, manifest)?;

        tracing::debug!("Wrote artifacts for {}", identity);
        Ok(())
    }

    /// Remove the archive blob and every blob expanded from it
    ///
    /// When the archive is still readable, one blob per archive entry is
    /// deleted in addition to the manifest. Absent blobs are not errors.
    pub fn remove(&self, identity: &PackageIdentity) -> Result<()> {
        let paths = self.context.paths();
        let archive_path = paths.archive(identity)?;

        if let Some(bytes) = self.context.read(&archive_path)? {
            match ZipPackage::open(bytes).and_then(|mut archive| archive.entry_names()) {
                Ok(names) => {
                    for name in names {
                        match paths.entry(identity, &name) {
                            Ok(path) => self.context.delete(&path)?,
                            Err(e) => {
                                tracing::debug!("Skipping entry '{}' of {}: {}", name, identity, e)
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Cannot enumerate archive of {}, removing known blobs only: {}",
                        identity,
                        e
                    );
                }
            }
        }

        self.context.delete(&paths.manifest(identity)?)?;
        self.context.delete(&archive_path)?;

        tracing::debug!("Removed artifacts for {}", identity);
        Ok(())
    }
}
