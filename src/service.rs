//! Feed service traits
//!
//! The publishing pipeline drives every feed service (flat container and its
//! siblings) through `FeedService`, and resolves package sets through
//! `PackageIdLookup`.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::flatcontainer::FlatContainer;
use crate::package::{PackageId, PackageIdentity, PackageInput};

/// A feed component updated on every publish
pub trait FeedService: Send + Sync {
    /// Service name for logging
    fn name(&self) -> &str;

    /// Add a batch of packages; completes or fails as a whole
    fn add_packages(&self, inputs: &[PackageInput]) -> Result<()>;

    /// Remove a batch of packages; completes or fails as a whole
    fn remove_packages(&self, packages: &[PackageIdentity]) -> Result<()>;

    /// Load any state needed before adds/removes
    fn fetch(&self) -> Result<()>;
}

/// Lookup of all published identities of an id
pub trait PackageIdLookup {
    fn packages_by_id(&self, id: &PackageId) -> Result<BTreeSet<PackageIdentity>>;
}

impl FeedService for FlatContainer {
    fn name(&self) -> &str {
        FlatContainer::name(self)
    }

    fn add_packages(&self, inputs: &[PackageInput]) -> Result<()> {
        FlatContainer::add_packages(self, inputs)
    }

    fn remove_packages(&self, packages: &[PackageIdentity]) -> Result<()> {
        FlatContainer::remove_packages(self, packages)
    }

    fn fetch(&self) -> Result<()> {
        FlatContainer::fetch(self)
    }
}

impl PackageIdLookup for FlatContainer {
    fn packages_by_id(&self, id: &PackageId) -> Result<BTreeSet<PackageIdentity>> {
        FlatContainer::packages_by_id(self, id)
    }
}
