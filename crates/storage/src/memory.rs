use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use modelbase_core::{Record, Storage, StorageResult};

use crate::objects::Objects;

/// In-memory storage.
///
/// Intended for tests/dev. `save` persists nothing and only counts flushes.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: Objects,
    flushes: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tracked records, keyed by `<TypeName>.<id>`.
    pub fn all(&self) -> StorageResult<BTreeMap<String, Record>> {
        self.objects.snapshot()
    }

    pub fn get(&self, type_name: &str, id: &str) -> StorageResult<Option<Record>> {
        self.objects.get(&format!("{type_name}.{id}"))
    }

    /// Stop tracking a record; returns it if it was tracked.
    pub fn remove(&self, type_name: &str, id: &str) -> StorageResult<Option<Record>> {
        self.objects.remove(&format!("{type_name}.{id}"))
    }

    pub fn len(&self) -> StorageResult<usize> {
        self.objects.len()
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Number of `save` calls so far.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Storage for InMemoryStorage {
    fn register(&self, record: Record) -> StorageResult<()> {
        let key = self.objects.insert(record)?;
        tracing::debug!(%key, "record tracked in memory");
        Ok(())
    }

    fn save(&self) -> StorageResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
