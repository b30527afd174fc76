//! # flatcontainer
//!
//! The "flat container" of a static package feed:
//! - One JSON version index per package id
//! - Archive and manifest blobs per package version
//! - Batched, idempotent add/remove over a plain blob store
//! - No database, no multi-key transactions
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 add_packages / remove_packages               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Batch Planner                            │
//! │          (group by id, one worker per id group)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │VersionIndex │          │ArtifactWriter│
//!   │ (index.json)│          │(nupkg/nuspec)│
//!   └──────┬──────┘          └──────┬───────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌──────────────┐
//!              │   Storage    │
//!              │ (blob store) │
//!              └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod cancel;

pub mod package;
pub mod archive;
pub mod storage;
pub mod flatcontainer;
pub mod service;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FeedError, PackageFailure, Result};
pub use config::Config;
pub use cancel::CancellationToken;
pub use flatcontainer::FlatContainer;
pub use package::{PackageId, PackageIdentity, PackageInput, PackageVersion};
pub use service::{FeedService, PackageIdLookup};
pub use storage::{FileStore, MemoryStore, Storage, StoragePath};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
