//! Concrete model types and the wiring that brings a store back to life.

pub mod base_model;

use std::sync::Arc;

use thiserror::Error;

pub use base_model::BaseModel;
pub use modelbase_core::{Entity, Model, Record, Registry, StorageHandle};
use modelbase_core::{DomainError, StorageError};
use modelbase_storage::{FileStorage, StorageConfig};

/// Failure while opening a store and rebuilding its entities.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Registry containing every model type defined in this crate.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<BaseModel>();
    registry
}

/// Rebuild typed entities from stored records, bound to `storage`.
///
/// Entities are not re-registered; they are already tracked by the store that
/// produced the records.
pub fn restore<I>(
    records: I,
    registry: &Registry,
    storage: &StorageHandle,
) -> Result<Vec<Box<dyn Model>>, DomainError>
where
    I: IntoIterator<Item = Record>,
{
    records
        .into_iter()
        .map(|record| registry.reconstruct(&record, storage.clone()))
        .collect()
}

/// Open the file store named by `config`, reload it and rebuild its entities.
pub fn open_file_storage(
    config: &StorageConfig,
    registry: &Registry,
) -> Result<(Arc<FileStorage>, Vec<Box<dyn Model>>), LoadError> {
    let storage = Arc::new(FileStorage::from_config(config));
    storage.reload()?;

    let handle: StorageHandle = storage.clone();
    let models = restore(storage.all()?.into_values(), registry, &handle)?;
    tracing::info!(
        path = %storage.path().display(),
        count = models.len(),
        "models restored"
    );
    Ok((storage, models))
}

#[cfg(test)]
mod tests {
    use modelbase_storage::InMemoryStorage;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_registry_knows_base_model() {
        let names: Vec<_> = default_registry().type_names().collect();
        assert_eq!(names, vec!["BaseModel"]);
    }

    #[test]
    fn restore_rebuilds_tracked_models_without_registering() {
        let source = Arc::new(InMemoryStorage::new());
        let handle: StorageHandle = source.clone();
        let a = BaseModel::create(handle.clone()).unwrap();
        let b = BaseModel::create(handle.clone()).unwrap();

        let target = Arc::new(InMemoryStorage::new());
        let target_handle: StorageHandle = target.clone();
        let models = restore(
            source.all().unwrap().into_values(),
            &default_registry(),
            &target_handle,
        )
        .unwrap();

        let mut records: Vec<_> = models.iter().map(|m| m.to_record()).collect();
        records.sort_by(|x, y| x.id().cmp(&y.id()));
        let mut expected = vec![a.to_record(), b.to_record()];
        expected.sort_by(|x, y| x.id().cmp(&y.id()));

        assert_eq!(records, expected);
        assert!(target.is_empty().unwrap());
    }

    #[test]
    fn restore_fails_on_unknown_type() {
        let storage: StorageHandle = Arc::new(InMemoryStorage::new());
        let record: Record =
            serde_json::from_value(json!({ "__class__": "Ghost", "id": "1" })).unwrap();

        let err = restore([record], &default_registry(), &storage).unwrap_err();
        assert_eq!(err, DomainError::UnknownType("Ghost".to_string()));
    }

    #[test]
    fn open_file_storage_restores_saved_models() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("file.json"));
        let registry = default_registry();

        let (storage, models) = open_file_storage(&config, &registry).unwrap();
        assert!(models.is_empty());

        let mut model = BaseModel::create(storage.clone()).unwrap();
        model.set("name", json!("My First Model")).unwrap();
        model.set("my_number", json!(89)).unwrap();
        model.save().unwrap();

        let (_, models) = open_file_storage(&config, &registry).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].type_name(), "BaseModel");
        assert_eq!(models[0].to_record(), model.to_record());
        assert_eq!(models[0].get("my_number"), Some(&json!(89)));
    }

    #[test]
    fn saving_a_restored_model_updates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("file.json"));
        let registry = default_registry();

        let (storage, _) = open_file_storage(&config, &registry).unwrap();
        let mut model = BaseModel::create(storage).unwrap();
        model.save().unwrap();

        let (_, mut models) = open_file_storage(&config, &registry).unwrap();
        models[0].set("name", json!("renamed")).unwrap();
        models[0].save().unwrap();

        let (_, models) = open_file_storage(&config, &registry).unwrap();
        assert_eq!(models[0].get("name"), Some(&json!("renamed")));
        assert_eq!(models[0].created_at(), model.created_at());
    }

    #[test]
    fn storage_persists_state_as_of_each_entity_last_registration() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("file.json"));
        let registry = default_registry();

        let (storage, _) = open_file_storage(&config, &registry).unwrap();
        let mut a = BaseModel::create(storage.clone()).unwrap();
        a.set("name", json!("x")).unwrap();
        let mut b = BaseModel::create(storage.clone()).unwrap();
        b.save().unwrap();

        let a_id = a.id().unwrap().to_string();
        let (reopened, _) = open_file_storage(&config, &registry).unwrap();
        let stored_a = reopened.get("BaseModel", &a_id).unwrap().unwrap();
        assert_eq!(stored_a.get("name"), None);

        a.save().unwrap();
        let (reopened, _) = open_file_storage(&config, &registry).unwrap();
        let stored_a = reopened.get("BaseModel", &a_id).unwrap().unwrap();
        assert_eq!(stored_a.get("name"), Some(&json!("x")));
        assert_eq!(stored_a, a.to_record());
    }
}
