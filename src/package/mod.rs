//! Package Module
//!
//! Identity types for published packages.
//!
//! ## Responsibilities
//! - Case-insensitive package ids
//! - Ordered, canonicalizable versions
//! - Add requests carrying the raw archive
//! - Reading the manifest embedded in an archive

mod manifest;
mod version;

pub use manifest::{PackageManifest, MANIFEST_EXTENSION};
pub use version::PackageVersion;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bytes::Bytes;

use crate::archive::ZipPackage;
use crate::error::{FeedError, Result};

// =============================================================================
// PackageId
// =============================================================================

/// A case-insensitive package id
///
/// Keeps the caller's spelling for display. Comparison, ordering and hashing
/// use the lower-cased form, which is also what storage paths are built from.
#[derive(Debug, Clone)]
pub struct PackageId {
    original: String,
    normalized: String,
}

impl PackageId {
    /// Create a package id, rejecting values that cannot form a path segment
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let original: String = id.into();
        let trimmed = original.trim();

        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains('/')
            || trimmed.contains('\\')
        {
            return Err(FeedError::InvalidPackageId(original));
        }

        Ok(Self {
            normalized: trimmed.to_lowercase(),
            original: trimmed.to_string(),
        })
    }

    /// The id as originally spelled
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The lower-cased id
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for PackageId {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// =============================================================================
// PackageIdentity
// =============================================================================

/// (id, version) pair naming one published package
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageIdentity {
    pub id: PackageId,
    pub version: PackageVersion,
}

impl PackageIdentity {
    pub fn new(id: PackageId, version: PackageVersion) -> Self {
        Self { id, version }
    }

    /// Parse both halves from strings
    pub fn parse(id: &str, version: &str) -> Result<Self> {
        Ok(Self {
            id: PackageId::new(id)?,
            version: PackageVersion::parse(version)?,
        })
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

// =============================================================================
// PackageInput
// =============================================================================

/// An add request: the identity being published and its raw archive
///
/// The manifest travels inside the archive and is extracted when artifacts
/// are written.
#[derive(Debug, Clone)]
pub struct PackageInput {
    pub identity: PackageIdentity,
    pub archive: Bytes,
}

impl PackageInput {
    /// Create an add request with a caller-supplied identity
    pub fn new(identity: PackageIdentity, archive: impl Into<Bytes>) -> Self {
        Self {
            identity,
            archive: archive.into(),
        }
    }

    /// Create an add request whose identity is read from the embedded manifest
    pub fn from_archive(archive: impl Into<Bytes>) -> Result<Self> {
        let archive = archive.into();
        let mut package = ZipPackage::open(archive.clone())?;
        let manifest = PackageManifest::from_archive(&mut package)?;

        Ok(Self {
            identity: manifest.identity(),
            archive,
        })
    }
}
