//! Archive Module
//!
//! Read access to package archives.
//!
//! ## Responsibilities
//! - Enumerate file entries of an archive
//! - Extract one entry's bytes
//! - Locate a root-level entry by case-insensitive file name

mod zip_package;

pub use zip_package::ZipPackage;

use bytes::Bytes;

use crate::error::{FeedError, Result};

/// Read access to the entries of one package archive
pub trait PackageArchive {
    /// Names of all file entries, `/`-separated, directories and unsafe names excluded
    fn entry_names(&mut self) -> Result<Vec<String>>;

    /// Bytes of the entry with exactly this name, `None` if absent
    fn extract(&mut self, name: &str) -> Result<Option<Bytes>>;

    /// Name of the root-level entry matching `file_name` case-insensitively
    ///
    /// Case folding is the same Unicode lower-casing `PackageId` uses.
    /// Returns `None` when nothing matches and a `DataFormat` error when more
    /// than one entry matches.
    fn find_entry(&mut self, file_name: &str) -> Result<Option<String>> {
        let wanted = file_name.to_lowercase();
        let mut matches = self
            .entry_names()?
            .into_iter()
            .filter(|name| name.to_lowercase() == wanted);

        let first = matches.next();
        if let Some(second) = matches.next() {
            return Err(FeedError::DataFormat(format!(
                "archive has more than one entry named '{}': '{}'",
                file_name, second
            )));
        }

        Ok(first)
    }
}
