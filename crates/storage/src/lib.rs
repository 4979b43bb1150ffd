//! Storage collaborators for `modelbase-core` entities.
//!
//! Both stores track records keyed by `<TypeName>.<id>`. `InMemoryStorage` never
//! leaves the process; `FileStorage` flushes the tracked set to a JSON file.

pub mod config;
pub mod file;
pub mod memory;
mod objects;

pub use config::StorageConfig;
pub use file::FileStorage;
pub use memory::InMemoryStorage;
