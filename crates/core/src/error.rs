//! Error model.
//!
//! `DomainError` covers data-level failures (bad records, bad identifiers).
//! `StorageError` covers failures of the storage collaborator and is what
//! `create`/`save` propagate.

use thiserror::Error;

/// Result type used for data-level operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type used for operations that reach the storage collaborator.
pub type StorageResult<T> = Result<T, StorageError>;

/// Data-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. writing a reserved field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (empty, or not a string).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A timestamp field could not be parsed.
    #[error("invalid timestamp for `{field}`: {reason}")]
    InvalidTimestamp { field: String, reason: String },

    /// The discriminator names a type nobody registered.
    #[error("unknown entity type: {0}")]
    UnknownType(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_timestamp(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }
}

/// Storage collaborator error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    LockPoisoned,

    /// The record lacks `__class__` or `id`, so it has no storage key.
    #[error("record cannot be keyed: missing `{0}`")]
    UnkeyedRecord(&'static str),
}
