//! JSON file-backed storage.
//!
//! The file holds a single JSON object mapping `<TypeName>.<id>` to the entity
//! record, the same shape `all()` returns.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use modelbase_core::{Record, Storage, StorageResult};

use crate::config::StorageConfig;
use crate::objects::Objects;

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    objects: Objects,
}

impl FileStorage {
    /// Storage bound to `path`. Nothing is read until [`FileStorage::reload`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: Objects::default(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.file_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tracked records, keyed by `<TypeName>.<id>`.
    pub fn all(&self) -> StorageResult<BTreeMap<String, Record>> {
        self.objects.snapshot()
    }

    pub fn get(&self, type_name: &str, id: &str) -> StorageResult<Option<Record>> {
        self.objects.get(&format!("{type_name}.{id}"))
    }

    /// Stop tracking a record. The file changes on the next `save`.
    pub fn remove(&self, type_name: &str, id: &str) -> StorageResult<Option<Record>> {
        self.objects.remove(&format!("{type_name}.{id}"))
    }

    pub fn len(&self) -> StorageResult<usize> {
        self.objects.len()
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Merge the file's records into the tracked set, returning how many were read.
    ///
    /// Records are keyed by their own `__class__` and `id`, whatever key the
    /// file stored them under. A missing file is not an error and loads nothing.
    pub fn reload(&self) -> StorageResult<usize> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no storage file; nothing to reload");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        // File keys are not trusted; each record is tracked under its own key.
        let entries: BTreeMap<String, Record> = serde_json::from_slice(&bytes)?;
        let count = self.objects.insert_all(entries.into_values())?;
        tracing::info!(path = %self.path.display(), count, "storage reloaded");
        Ok(count)
    }

    fn write_file(&self, entries: &BTreeMap<String, Record>) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(entries)?;

        // Write beside the target, then rename over it.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn register(&self, record: Record) -> StorageResult<()> {
        let key = self.objects.insert(record)?;
        tracing::debug!(%key, "record tracked");
        Ok(())
    }

    fn save(&self) -> StorageResult<()> {
        let entries = self.objects.snapshot()?;
        self.write_file(&entries)?;
        tracing::info!(path = %self.path.display(), count = entries.len(), "storage flushed");
        Ok(())
    }
}
