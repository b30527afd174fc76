//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use flatcontainer::{
    Config, FeedError, FlatContainer, MemoryStore, PackageIdentity, PackageInput, Result,
    Storage, StoragePath,
};
use parking_lot::Mutex;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// =============================================================================
// Archive Fixtures
// =============================================================================

/// Build a zip archive from (name, content) pairs
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn nuspec(id: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{}</id>
    <version>{}</version>
    <authors>test</authors>
    <description>fixture</description>
  </metadata>
</package>"#,
        id, version
    )
}

/// A package archive with a manifest named after the id (original casing)
pub fn package_archive(id: &str, version: &str) -> Vec<u8> {
    let manifest = nuspec(id, version);
    let dll = format!("lib/net45/{}.dll", id);
    let manifest_name = format!("{}.nuspec", id);
    zip_archive(&[
        (manifest_name.as_str(), manifest.as_bytes()),
        ("_rels/.rels", &b"<Relationships/>"[..]),
        (dll.as_str(), &b"MZ"[..]),
    ])
}

pub fn archive_without_manifest() -> Vec<u8> {
    zip_archive(&[
        ("lib/net45/a.dll", &b"MZ"[..]),
        ("readme.txt", &b"no manifest here"[..]),
    ])
}

pub fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::parse(id, version).unwrap()
}

pub fn input(id: &str, version: &str) -> PackageInput {
    PackageInput::new(identity(id, version), package_archive(id, version))
}

pub fn path(s: &str) -> StoragePath {
    StoragePath::new(s).unwrap()
}

// =============================================================================
// Recording Store
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(String),
    Delete(String),
}

/// MemoryStore wrapper that records mutations and can fail on demand
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    ops: Mutex<Vec<Op>>,
    fail_prefix: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write/delete under `prefix` fail with a storage error
    pub fn fail_under(&self, prefix: &str) {
        *self.fail_prefix.lock() = Some(prefix.to_string());
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().clear();
    }

    /// Number of index document writes and deletes
    pub fn index_mutations(&self) -> usize {
        self.ops
            .lock()
            .iter()
            .filter(|op| match op {
                Op::Write(p) | Op::Delete(p) => p.ends_with("/index.json"),
            })
            .count()
    }

    fn check(&self, path: &StoragePath) -> Result<()> {
        match self.fail_prefix.lock().as_deref() {
            Some(prefix) if path.as_str().starts_with(prefix) => {
                Err(FeedError::Storage(format!("injected failure at {}", path)))
            }
            _ => Ok(()),
        }
    }
}

impl Storage for RecordingStore {
    fn exists(&self, path: &StoragePath) -> Result<bool> {
        self.inner.exists(path)
    }

    fn read(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        self.inner.read(path)
    }

    fn write(&self, path: &StoragePath, data: Bytes) -> Result<()> {
        self.check(path)?;
        self.ops.lock().push(Op::Write(path.to_string()));
        self.inner.write(path, data)
    }

    fn delete(&self, path: &StoragePath) -> Result<()> {
        self.check(path)?;
        self.ops.lock().push(Op::Delete(path.to_string()));
        self.inner.delete(path)
    }
}

// =============================================================================
// Container Setup
// =============================================================================

pub fn setup_container() -> (Arc<RecordingStore>, FlatContainer) {
    let store = Arc::new(RecordingStore::new());
    let config = Config::builder().max_parallelism(4).build();
    let container = FlatContainer::open(config, store.clone()).unwrap();
    (store, container)
}
