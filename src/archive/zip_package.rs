//! Zip-backed package archive

use std::io::{Cursor, Read};

use bytes::Bytes;
use zip::ZipArchive;

use crate::error::Result;

use super::PackageArchive;

/// A package archive held in memory
pub struct ZipPackage {
    archive: ZipArchive<Cursor<Bytes>>,
}

impl ZipPackage {
    /// Open an archive over its raw bytes (reads the central directory only)
    pub fn open(bytes: Bytes) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }

    /// Number of raw entries, directories included
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

impl PackageArchive for ZipPackage {
    fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());

        for index in 0..self.archive.len() {
            let file = self.archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }

            // Absolute paths and `..` components never map to a storage key
            if file.enclosed_name().is_none() {
                tracing::debug!("Skipping unsafe archive entry '{}'", file.name());
                continue;
            }

            names.push(file.name().replace('\\', "/"));
        }

        Ok(names)
    }

    fn extract(&mut self, name: &str) -> Result<Option<Bytes>> {
        // Names are reported with `/`; the archive may store `\`
        let index = self
            .archive
            .index_for_name(name)
            .or_else(|| self.archive.index_for_name(&name.replace('/', "\\")));

        let Some(index) = index else {
            return Ok(None);
        };

        let mut file = self.archive.by_index(index)?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        Ok(Some(Bytes::from(buf)))
    }
}
