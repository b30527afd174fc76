//! Flat Container Module
//!
//! Static per-id version indexes and package artifacts.
//!
//! ## Responsibilities
//! - Derive lower-cased storage keys for indexes and artifacts
//! - Keep each id's index equal to the set of versions with artifacts
//! - Recompute each affected index exactly once per batch call
//! - Fan id groups out concurrently, aggregate their failures
//!
//! ## Layout
//! ```text
//! {container}/
//!   └── {id}/
//!         ├── index.json                  {"versions": [...]}
//!         └── {version}/
//!               ├── {id}.{version}.nupkg  archive
//!               └── {id}.nuspec           manifest
//! ```
//!
//! ## Concurrency
//! One batch call never touches the same id from two threads. Overlapping
//! calls on the same id are NOT serialized here; the caller must hold a
//! feed-level lock around them.

mod artifacts;
mod context;
mod index;
mod paths;
mod planner;

pub use artifacts::ArtifactWriter;
pub use context::FeedContext;
pub use index::{IndexDocument, VersionIndex};
pub use paths::{FlatContainerPaths, ARCHIVE_EXTENSION, INDEX_FILE_NAME};
pub use planner::{group_by_id, run_groups, IdGroup};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::{PackageFailure, Result};
use crate::package::{PackageId, PackageIdentity, PackageInput, PackageVersion};
use crate::storage::{Storage, StoragePath};

/// The flat container service
pub struct FlatContainer {
    context: FeedContext,
}

impl FlatContainer {
    pub const NAME: &'static str = "FlatContainer";

    /// Open a flat container over a storage backend
    pub fn open(config: Config, store: Arc<dyn Storage>) -> Result<Self> {
        Ok(Self {
            context: FeedContext::new(config, store)?,
        })
    }

    /// Use `token` for cooperative cancellation of later calls
    pub fn with_token(self, token: CancellationToken) -> Self {
        Self {
            context: self.context.with_token(token),
        }
    }

    pub fn name(&self) -> &str {
        Self::NAME
    }

    pub fn context(&self) -> &FeedContext {
        &self.context
    }

    // =========================================================================
    // Add
    // =========================================================================

    pub fn add_package(&self, input: &PackageInput) -> Result<()> {
        self.add_packages(std::slice::from_ref(input))
    }

    /// Add a batch of packages
    ///
    /// Per id: artifacts are written package by package, then the index is
    /// recomputed once from the versions whose artifacts succeeded. A failing
    /// package does not stop its siblings.
    pub fn add_packages(&self, inputs: &[PackageInput]) -> Result<()> {
        let groups = group_by_id(inputs.iter(), |input| &input.identity.id);

        tracing::info!(
            "Adding {} package(s) across {} id(s)",
            inputs.len(),
            groups.len()
        );

        run_groups(
            &groups,
            self.context.config().max_parallelism,
            self.context.token(),
            |group| self.add_group(group),
        )
    }

    fn add_group(&self, group: &IdGroup<&PackageInput>) -> Vec<PackageFailure> {
        let writer = ArtifactWriter::new(&self.context);
        let mut failures = Vec::new();
        let mut added = Vec::with_capacity(group.items.len());

        for input in &group.items {
            let identity = &input.identity;
            match writer.write(input) {
                Ok(()) => added.push(identity.version.clone()),
                Err(e) => {
                    tracing::warn!("Failed to add {}: {}", identity, e);
                    failures.push(PackageFailure::package(
                        identity.id.clone(),
                        identity.version.clone(),
                        e,
                    ));
                }
            }
        }

        if !added.is_empty() {
            if let Err(e) = VersionIndex::new(&self.context).apply_add(&group.id, added) {
                tracing::warn!("Failed to update index for {}: {}", group.id, e);
                failures.push(PackageFailure::group(group.id.clone(), e));
            }
        }

        failures
    }

    // =========================================================================
    // Remove
    // =========================================================================

    pub fn remove_package(&self, package: &PackageIdentity) -> Result<()> {
        self.remove_packages(std::slice::from_ref(package))
    }

    /// Remove a batch of packages
    ///
    /// Per id: the index is recomputed once, then artifacts are removed.
    /// Artifacts are left in place when the index update fails.
    pub fn remove_packages(&self, packages: &[PackageIdentity]) -> Result<()> {
        let groups = group_by_id(packages.iter(), |package| &package.id);

        tracing::info!(
            "Removing {} package(s) across {} id(s)",
            packages.len(),
            groups.len()
        );

        run_groups(
            &groups,
            self.context.config().max_parallelism,
            self.context.token(),
            |group| self.remove_group(group),
        )
    }

    fn remove_group(&self, group: &IdGroup<&PackageIdentity>) -> Vec<PackageFailure> {
        let unique: BTreeSet<&PackageIdentity> = group.items.iter().copied().collect();
        let versions = unique.iter().map(|package| &package.version);

        if let Err(e) = VersionIndex::new(&self.context).apply_remove(&group.id, versions) {
            tracing::warn!("Failed to update index for {}: {}", group.id, e);
            return vec![PackageFailure::group(group.id.clone(), e)];
        }

        let writer = ArtifactWriter::new(&self.context);
        unique
            .into_iter()
            .filter_map(|package| {
                writer.remove(package).err().map(|e| {
                    tracing::warn!("Failed to remove artifacts of {}: {}", package, e);
                    PackageFailure::package(package.id.clone(), package.version.clone(), e)
                })
            })
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Published versions of an id, ascending
    pub fn versions(&self, id: &PackageId) -> Result<BTreeSet<PackageVersion>> {
        VersionIndex::new(&self.context).read(id)
    }

    /// Published identities of an id
    pub fn packages_by_id(&self, id: &PackageId) -> Result<BTreeSet<PackageIdentity>> {
        Ok(self
            .versions(id)?
            .into_iter()
            .map(|version| PackageIdentity::new(id.clone(), version))
            .collect())
    }

    /// Nothing to prefetch: every read goes straight to storage
    pub fn fetch(&self) -> Result<()> {
        Ok(())
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn index_path(&self, id: &PackageId) -> Result<StoragePath> {
        self.context.paths().index(id)
    }

    pub fn archive_path(&self, package: &PackageIdentity) -> Result<StoragePath> {
        self.context.paths().archive(package)
    }

    pub fn manifest_path(&self, package: &PackageIdentity) -> Result<StoragePath> {
        self.context.paths().manifest(package)
    }

    pub fn entry_path(&self, package: &PackageIdentity, file_path: &str) -> Result<StoragePath> {
        self.context.paths().entry(package, file_path)
    }
}
