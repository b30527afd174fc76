//! Package versions
//!
//! NuGet-style versions: `major.minor[.patch[.revision]][-labels][+metadata]`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{FeedError, Result};

/// A parsed, totally ordered package version
///
/// Equality, ordering and hashing ignore build metadata and the case of
/// prerelease labels, so `1.0.0-Beta+abc` and `1.0.0-beta` are the same version.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    release_labels: Vec<String>,
    metadata: Option<String>,
}

impl PackageVersion {
    /// Create a release version from numeric parts
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            release_labels: Vec::new(),
            metadata: None,
        }
    }

    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || FeedError::InvalidVersion(input.to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        // Step 1: Split off build metadata
        let (rest, metadata) = match trimmed.split_once('+') {
            Some((rest, meta)) => {
                if !is_valid_label_list(meta) {
                    return Err(invalid());
                }
                (rest, Some(meta.to_string()))
            }
            None => (trimmed, None),
        };

        // Step 2: Split off prerelease labels
        let (core, release_labels) = match rest.split_once('-') {
            Some((core, release)) => {
                if !is_valid_label_list(release) {
                    return Err(invalid());
                }
                (core, release.split('.').map(str::to_string).collect())
            }
            None => (rest, Vec::new()),
        };

        // Step 3: 1-4 numeric parts, missing parts are zero
        let mut parts = [0u64; 4];
        let mut count = 0;
        for segment in core.split('.') {
            if count == parts.len() || segment.is_empty() {
                return Err(invalid());
            }
            if !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[count] = segment.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            revision: parts[3],
            release_labels,
            metadata,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn release_labels(&self) -> &[String] {
        &self.release_labels
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.release_labels.is_empty()
    }

    /// Canonical form used in index documents and storage paths
    ///
    /// `1.0` → `1.0.0`, `1.0.0.0` → `1.0.0`, `1.0.0.4-RC+sha` → `1.0.0.4-RC`,
    /// `1.0.0-rc.01` → `1.0.0-rc.1`
    pub fn to_identity_string(&self) -> String {
        let mut out = format!("{}.{}.{}", self.major, self.minor, self.patch);
        if self.revision > 0 {
            out.push_str(&format!(".{}", self.revision));
        }
        for (i, label) in self.release_labels.iter().enumerate() {
            out.push(if i == 0 { '-' } else { '.' });
            match numeric_label(label) {
                Some(n) => out.push_str(&n.to_string()),
                None => out.push_str(label),
            }
        }
        out
    }
}

fn is_valid_label_list(labels: &str) -> bool {
    labels.split('.').all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn compare_labels(a: &[String], b: &[String]) -> Ordering {
    // A release sorts after every prerelease of the same numeric version
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (left, right) in a.iter().zip(b.iter()) {
        let ordering = compare_label(left, right);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a.len().cmp(&b.len())
}

/// Value of an all-digit label; numeric labels compare and render by value
fn numeric_label(label: &str) -> Option<u64> {
    if label.bytes().all(|c| c.is_ascii_digit()) {
        label.parse().ok()
    } else {
        None
    }
}

fn compare_label(a: &str, b: &str) -> Ordering {
    match (numeric_label(a), numeric_label(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase())),
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision)
            .cmp(&(other.major, other.minor, other.patch, other.revision))
            .then_with(|| compare_labels(&self.release_labels, &other.release_labels))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch, self.revision).hash(state);
        for label in &self.release_labels {
            // "01" and "1" must hash alike
            match numeric_label(label) {
                Some(n) => n.hash(state),
                None => label.to_ascii_lowercase().hash(state),
            }
        }
        self.release_labels.len().hash(state);
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_identity_string())
    }
}

impl FromStr for PackageVersion {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
