//! Storage collaborator boundary.

use std::sync::Arc;

use crate::error::StorageResult;
use crate::record::Record;

/// Registry of entities, persisted on demand.
///
/// Implementations key records by `<TypeName>.<id>` (see `Record::storage_key`).
/// A store holds the record it was handed, not the entity itself: changes made
/// with `Model::set` reach storage only when that entity calls `save` (or is
/// registered again). Flushing writes each entity as of its last registration.
pub trait Storage: Send + Sync {
    /// Start (or keep) tracking the entity described by `record`, replacing any
    /// previous record under the same key.
    fn register(&self, record: Record) -> StorageResult<()>;

    /// Persist every tracked record.
    fn save(&self) -> StorageResult<()>;
}

/// Shared handle injected into every entity.
pub type StorageHandle = Arc<dyn Storage>;

impl<S> Storage for Arc<S>
where
    S: Storage + ?Sized,
{
    fn register(&self, record: Record) -> StorageResult<()> {
        (**self).register(record)
    }

    fn save(&self) -> StorageResult<()> {
        (**self).save()
    }
}
