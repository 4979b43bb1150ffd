use std::collections::BTreeMap;
use std::sync::RwLock;

use modelbase_core::{Record, StorageError, StorageResult};

/// Tracked records keyed by `<TypeName>.<id>`.
#[derive(Debug, Default)]
pub(crate) struct Objects {
    inner: RwLock<BTreeMap<String, Record>>,
}

impl Objects {
    pub(crate) fn insert(&self, record: Record) -> StorageResult<String> {
        let key = storage_key(&record)?;
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.insert(key.clone(), record);
        Ok(key)
    }

    /// Track every record under its own `<TypeName>.<id>` key.
    ///
    /// All records are keyed before any is inserted, so an unkeyed record
    /// leaves the tracked set untouched.
    pub(crate) fn insert_all<I>(&self, records: I) -> StorageResult<usize>
    where
        I: IntoIterator<Item = Record>,
    {
        let keyed = records
            .into_iter()
            .map(|record| storage_key(&record).map(|key| (key, record)))
            .collect::<StorageResult<Vec<_>>>()?;

        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        let count = keyed.len();
        map.extend(keyed);
        Ok(count)
    }

    pub(crate) fn get(&self, key: &str) -> StorageResult<Option<Record>> {
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    pub(crate) fn remove(&self, key: &str) -> StorageResult<Option<Record>> {
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.remove(key))
    }

    pub(crate) fn snapshot(&self) -> StorageResult<BTreeMap<String, Record>> {
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.clone())
    }

    pub(crate) fn len(&self) -> StorageResult<usize> {
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.len())
    }
}

fn storage_key(record: &Record) -> StorageResult<String> {
    if record.class_name().is_none() {
        return Err(StorageError::UnkeyedRecord(modelbase_core::CLASS_KEY));
    }
    record
        .storage_key()
        .ok_or(StorageError::UnkeyedRecord("id"))
}
