//! Discriminator-driven reconstruction of heterogeneous records.

use std::collections::BTreeMap;

use crate::entity::{Entity, Model};
use crate::error::{DomainError, DomainResult};
use crate::record::{CLASS_KEY, Record};
use crate::storage::StorageHandle;

type Reconstruct = fn(&Record, StorageHandle) -> DomainResult<Box<dyn Model>>;

/// Maps `__class__` values to the constructor of the matching entity type.
#[derive(Default, Clone)]
pub struct Registry {
    constructors: BTreeMap<&'static str, Reconstruct>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `E` reconstructible. Registering the same type twice is a no-op.
    pub fn register<E>(&mut self) -> &mut Self
    where
        E: Entity + 'static,
    {
        self.constructors.insert(E::TYPE_NAME, reconstruct_as::<E>);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Rebuild the entity named by the record's discriminator.
    pub fn reconstruct(&self, record: &Record, storage: StorageHandle) -> DomainResult<Box<dyn Model>> {
        let type_name = record
            .class_name()
            .ok_or_else(|| DomainError::validation(format!("record has no `{CLASS_KEY}` field")))?;
        let construct = self
            .constructors
            .get(type_name)
            .ok_or_else(|| DomainError::unknown_type(type_name))?;
        construct(record, storage)
    }
}

fn reconstruct_as<E>(record: &Record, storage: StorageHandle) -> DomainResult<Box<dyn Model>>
where
    E: Entity + 'static,
{
    let entity = E::from_record(record, storage)?;
    Ok(Box::new(entity))
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::StorageResult;
    use crate::storage::Storage;

    crate::entity! {
        struct Foo;
    }

    crate::entity! {
        struct Bar;
    }

    struct NullStorage;

    impl Storage for NullStorage {
        fn register(&self, _record: Record) -> StorageResult<()> {
            Ok(())
        }

        fn save(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register::<Foo>().register::<Bar>();
        registry
    }

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn dispatches_on_discriminator() {
        let storage: StorageHandle = Arc::new(NullStorage);
        let registry = registry();

        let bar = registry
            .reconstruct(&record(json!({ "id": "1", "__class__": "Bar" })), storage)
            .unwrap();

        assert_eq!(bar.type_name(), "Bar");
        assert_eq!(bar.to_record().class_name(), Some("Bar"));
        assert!(bar.to_string().starts_with("[Bar] (1) "));
    }

    #[test]
    fn rejects_missing_discriminator() {
        let storage: StorageHandle = Arc::new(NullStorage);
        let err = registry()
            .reconstruct(&record(json!({ "id": "1" })), storage)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_type() {
        let storage: StorageHandle = Arc::new(NullStorage);
        let err = registry()
            .reconstruct(&record(json!({ "id": "1", "__class__": "Baz" })), storage)
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownType("Baz".to_string()));
    }

    #[test]
    fn lists_type_names_sorted() {
        let names: Vec<_> = registry().type_names().collect();
        assert_eq!(names, vec!["Bar", "Foo"]);
        assert!(registry().contains("Foo"));
    }
}
