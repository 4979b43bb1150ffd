//! `modelbase-core` — the entity contract shared by every model type.
//!
//! Identity, timestamps, dictionary (de)serialization and the storage hook.
//! Concrete storage engines live in `modelbase-storage`.

pub mod base;
pub mod entity;
pub mod error;
pub mod id;
pub mod record;
pub mod registry;
pub mod storage;
pub mod timestamp;

pub use base::Base;
pub use entity::{Entity, Model};
pub use error::{DomainError, DomainResult, StorageError, StorageResult};
pub use id::EntityId;
pub use record::{CLASS_KEY, Record};
pub use registry::Registry;
pub use storage::{Storage, StorageHandle};
pub use timestamp::Timestamp;
