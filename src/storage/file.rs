//! Local directory storage backend

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::error::Result;

use super::{Storage, StoragePath};

/// Blob store rooted at a local directory
///
/// Each key maps to `{root}/{segment}/.../{segment}`. Writes go to a temp
/// file in the target directory and are renamed into place, so readers see
/// either the old or the new content, never a partial blob.
#[derive(Debug)]
pub struct FileStore {
    /// Root directory for all blobs
    root: PathBuf,

    /// Suffix counter for temp files (atomic, lock-free)
    next_temp_id: AtomicU64,
}

impl FileStore {
    /// Open or create a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            next_temp_id: AtomicU64::new(0),
        })
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path
    pub fn file_path(&self, path: &StoragePath) -> PathBuf {
        let mut file_path = self.root.clone();
        for segment in path.segments() {
            file_path.push(segment);
        }
        file_path
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let id = self.next_temp_id.fetch_add(1, Ordering::SeqCst);
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), id))
    }
}

impl Storage for FileStore {
    fn exists(&self, path: &StoragePath) -> Result<bool> {
        match fs::metadata(self.file_path(path)) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        match fs::read(self.file_path(path)) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &StoragePath, data: Bytes) -> Result<()> {
        let target = self.file_path(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // Step 1: Write and sync the temp file
        let temp = self.temp_path(&target);
        let written = fs::File::create(&temp).and_then(|mut file| {
            file.write_all(&data)?;
            file.sync_all()
        });

        // Step 2: Rename into place (replaces any existing blob)
        let result = written.and_then(|()| fs::rename(&temp, &target));
        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        tracing::trace!("Wrote {} bytes to {}", data.len(), target.display());
        Ok(())
    }

    fn delete(&self, path: &StoragePath) -> Result<()> {
        match fs::remove_file(self.file_path(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
