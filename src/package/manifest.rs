//! Package manifest (`.nuspec`) reading

use bytes::Bytes;

use crate::archive::PackageArchive;
use crate::error::{FeedError, Result};

use super::{PackageId, PackageIdentity, PackageVersion};

/// File extension of the manifest entry inside a package archive
pub const MANIFEST_EXTENSION: &str = ".nuspec";

/// Identity fields read from a package manifest, plus its raw bytes
#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub id: PackageId,
    pub version: PackageVersion,
    pub xml: Bytes,
}

impl PackageManifest {
    /// Parse manifest XML
    ///
    /// Reads `package/metadata/id` and `package/metadata/version`, matching
    /// on local names so any nuspec schema namespace is accepted.
    pub fn parse(xml: Bytes) -> Result<Self> {
        let (id, version) = {
            let text = std::str::from_utf8(&xml)
                .map_err(|e| FeedError::DataFormat(format!("manifest is not UTF-8: {}", e)))?;

            let doc = roxmltree::Document::parse(text)
                .map_err(|e| FeedError::DataFormat(format!("manifest is not valid XML: {}", e)))?;

            let metadata = doc
                .root_element()
                .children()
                .find(|node| node.is_element() && node.tag_name().name() == "metadata")
                .ok_or_else(|| {
                    FeedError::DataFormat("manifest has no <metadata> element".to_string())
                })?;

            let field = |name: &str| -> Result<String> {
                metadata
                    .children()
                    .find(|node| node.is_element() && node.tag_name().name() == name)
                    .and_then(|node| node.text())
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .ok_or_else(|| {
                        FeedError::DataFormat(format!("manifest has no <{}> value", name))
                    })
            };

            (PackageId::new(field("id")?)?, PackageVersion::parse(&field("version")?)?)
        };

        Ok(Self { id, version, xml })
    }

    /// Locate and parse the single root-level manifest of an archive
    pub fn from_archive(archive: &mut dyn PackageArchive) -> Result<Self> {
        let mut candidates = archive.entry_names()?.into_iter().filter(|name| {
            !name.contains('/') && name.to_ascii_lowercase().ends_with(MANIFEST_EXTENSION)
        });

        let name = candidates
            .next()
            .ok_or_else(|| FeedError::DataFormat("archive contains no manifest".to_string()))?;

        if let Some(other) = candidates.next() {
            return Err(FeedError::DataFormat(format!(
                "archive contains more than one manifest: '{}' and '{}'",
                name, other
            )));
        }

        let xml = archive
            .extract(&name)?
            .ok_or_else(|| FeedError::DataFormat(format!("manifest '{}' is unreadable", name)))?;

        Self::parse(xml)
    }

    pub fn identity(&self) -> PackageIdentity {
        PackageIdentity::new(self.id.clone(), self.version.clone())
    }
}
