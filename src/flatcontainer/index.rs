//! Per-id version index
//!
//! ## Document Format
//! ```text
//! {
//!   "versions": ["1.0.0", "1.1.0-beta", "2.0.0"]
//! }
//! ```
//! Versions are canonical identity strings in ascending order. An absent
//! document is the only representation of an empty set.

use std::collections::BTreeSet;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::package::{PackageId, PackageVersion};

use super::FeedContext;

/// Persisted form of a version set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub versions: Vec<String>,
}

impl IndexDocument {
    /// Build a document from a set (already ascending)
    pub fn from_versions(versions: &BTreeSet<PackageVersion>) -> Self {
        Self {
            versions: versions.iter().map(PackageVersion::to_identity_string).collect(),
        }
    }

    /// Extract the version set from a parsed JSON value
    ///
    /// A missing or non-array `versions` property is treated as an empty set.
    /// Array elements that do not parse as versions are errors.
    pub fn versions_from_json(json: &Value) -> Result<BTreeSet<PackageVersion>> {
        let Some(array) = json.get("versions").and_then(Value::as_array) else {
            return Ok(BTreeSet::new());
        };

        array
            .iter()
            .map(|element| match element {
                Value::String(s) => PackageVersion::parse(s),
                other => PackageVersion::parse(&other.to_string()),
            })
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec_pretty(self)?))
    }
}

/// Reads and rewrites the version index of package ids
pub struct VersionIndex<'a> {
    context: &'a FeedContext,
}

impl<'a> VersionIndex<'a> {
    pub fn new(context: &'a FeedContext) -> Self {
        Self { context }
    }

    /// Load the version set for an id (empty when absent or malformed)
    pub fn read(&self, id: &PackageId) -> Result<BTreeSet<PackageVersion>> {
        let path = self.context.paths().index(id)?;

        match self.context.read_json(&path)? {
            Some(json) => IndexDocument::versions_from_json(&json),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Persist `read(id) ∪ versions` and return the new set
    ///
    /// Always writes, even when nothing changed.
    pub fn apply_add(
        &self,
        id: &PackageId,
        versions: impl IntoIterator<Item = PackageVersion>,
    ) -> Result<BTreeSet<PackageVersion>> {
        let mut all = self.read(id)?;
        all.extend(versions);

        self.write(id, &all)?;

        tracing::debug!("Index for {} now has {} version(s)", id, all.len());
        Ok(all)
    }

    /// Persist `read(id) \ versions` and return the new set
    ///
    /// Deletes the document instead of writing an empty array.
    pub fn apply_remove<'v>(
        &self,
        id: &PackageId,
        versions: impl IntoIterator<Item = &'v PackageVersion>,
    ) -> Result<BTreeSet<PackageVersion>> {
        let mut remaining = self.read(id)?;
        for version in versions {
            remaining.remove(version);
        }

        if remaining.is_empty() {
            let path = self.context.paths().index(id)?;
            self.context.delete(&path)?;
            tracing::debug!("Index for {} is empty, document deleted", id);
        } else {
            self.write(id, &remaining)?;
            tracing::debug!("Index for {} now has {} version(s)", id, remaining.len());
        }

        Ok(remaining)
    }

    fn write(&self, id: &PackageId, versions: &BTreeSet<PackageVersion>) -> Result<()> {
        let path = self.context.paths().index(id)?;
        let bytes = IndexDocument::from_versions(versions).to_bytes()?;
        self.context.write(&path, bytes)
    }
}
