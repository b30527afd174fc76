//! Error types for the flat container
//!
//! Provides a unified error type for all operations.

use std::fmt;

use thiserror::Error;

use crate::package::{PackageId, PackageVersion};

/// Result type alias using FeedError
pub type Result<T> = std::result::Result<T, FeedError>;

/// Unified error type for flat container operations
#[derive(Debug, Error)]
pub enum FeedError {
    // -------------------------------------------------------------------------
    // Storage Errors (passed through from the backend, never retried here)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    // -------------------------------------------------------------------------
    // Data Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid package data: {0}")]
    DataFormat(String),

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Invalid package id '{0}'")]
    InvalidPackageId(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Batch worker panicked")]
    WorkerPanicked,

    // -------------------------------------------------------------------------
    // Batch Errors
    // -------------------------------------------------------------------------
    #[error("Batch failed: {} failure(s), first: {}", .failures.len(), FirstFailure(.failures))]
    Batch { failures: Vec<PackageFailure> },
}

impl FeedError {
    /// True for errors caused by malformed package data rather than the backend
    pub fn is_data_format(&self) -> bool {
        matches!(self, FeedError::DataFormat(_) | FeedError::InvalidVersion(_))
    }

    /// Failures carried by a `Batch` error (empty for every other variant)
    pub fn failures(&self) -> &[PackageFailure] {
        match self {
            FeedError::Batch { failures } => failures,
            _ => &[],
        }
    }
}

/// One failed unit of a batch call
///
/// `version` is `None` when the failure belongs to the whole id group
/// (index recomputation, cancellation before the group started).
#[derive(Debug)]
pub struct PackageFailure {
    pub id: PackageId,
    pub version: Option<PackageVersion>,
    pub error: FeedError,
}

impl PackageFailure {
    /// Failure scoped to one package
    pub fn package(id: PackageId, version: PackageVersion, error: FeedError) -> Self {
        Self {
            id,
            version: Some(version),
            error,
        }
    }

    /// Failure scoped to a whole id group
    pub fn group(id: PackageId, error: FeedError) -> Self {
        Self {
            id,
            version: None,
            error,
        }
    }
}

impl fmt::Display for PackageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}: {}", self.id, version, self.error),
            None => write!(f, "{}: {}", self.id, self.error),
        }
    }
}

struct FirstFailure<'a>(&'a [PackageFailure]);

impl fmt::Display for FirstFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(failure) => write!(f, "{}", failure),
            None => write!(f, "none"),
        }
    }
}
