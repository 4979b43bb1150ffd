//! Entity contract: identity, timestamps, (de)serialization and the storage hook.

use serde_json::Value;

use crate::base::Base;
use crate::error::{DomainResult, StorageResult};
use crate::id::EntityId;
use crate::record::Record;
use crate::storage::StorageHandle;
use crate::timestamp::Timestamp;

/// Object-safe view of an entity.
///
/// Everything here is derived from `base()`/`type_name()`, so concrete types only
/// wire up their `Base` (the `entity!` macro does this).
pub trait Model: core::fmt::Display + core::fmt::Debug {
    /// Name of the concrete type, used as the `__class__` discriminator.
    fn type_name(&self) -> &'static str;

    fn base(&self) -> &Base;

    fn base_mut(&mut self) -> &mut Base;

    fn id(&self) -> Option<&EntityId> {
        self.base().id()
    }

    fn created_at(&self) -> Option<Timestamp> {
        self.base().created_at()
    }

    fn updated_at(&self) -> Option<Timestamp> {
        self.base().updated_at()
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.base().get(key)
    }

    /// Set an extension attribute. Storage sees it on the next `save`.
    fn set(&mut self, key: &str, value: Value) -> DomainResult<Option<Value>> {
        self.base_mut().set(key, value)
    }

    /// Dictionary form: all fields, timestamps as text, plus `__class__`.
    fn to_record(&self) -> Record {
        self.base().to_record(self.type_name())
    }

    /// Refresh `updated_at`, re-register with storage and flush it.
    fn save(&mut self) -> StorageResult<()> {
        self.base_mut().touch();
        let record = self.to_record();
        let storage = self.base().storage().clone();
        tracing::debug!(
            entity_type = self.type_name(),
            id = ?self.id(),
            updated_at = ?self.updated_at(),
            "saving entity"
        );
        storage.register(record)?;
        storage.save()
    }
}

/// Concrete entity type with its constructors.
pub trait Entity: Model + Sized {
    const TYPE_NAME: &'static str;

    fn from_base(base: Base) -> Self;

    /// Create a brand new entity and register it with `storage`.
    fn create(storage: StorageHandle) -> StorageResult<Self> {
        let entity = Self::from_base(Base::fresh(storage));
        tracing::debug!(entity_type = Self::TYPE_NAME, id = ?entity.id(), "entity created");
        entity.base().storage().register(entity.to_record())?;
        Ok(entity)
    }

    /// Rebuild an entity from its dictionary form. Storage is not notified.
    fn from_record(record: &Record, storage: StorageHandle) -> DomainResult<Self> {
        Base::from_record(record, storage).map(Self::from_base)
    }
}

/// Declare a concrete entity type backed by [`Base`].
///
/// ```ignore
/// modelbase_core::entity! {
///     /// A place to stay.
///     pub struct Place;
/// }
/// ```
#[macro_export]
macro_rules! entity {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            base: $crate::Base,
        }

        impl $crate::Model for $name {
            fn type_name(&self) -> &'static str {
                <Self as $crate::Entity>::TYPE_NAME
            }

            fn base(&self) -> &$crate::Base {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::Base {
                &mut self.base
            }
        }

        impl $crate::Entity for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn from_base(base: $crate::Base) -> Self {
                Self { base }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                self.base.render(<Self as $crate::Entity>::TYPE_NAME, f)
            }
        }
    };
}
