//! Shared state carried by every entity: identity, timestamps, extension
//! attributes and the storage handle.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::id::EntityId;
use crate::record::{CLASS_KEY, CREATED_AT_KEY, ID_KEY, RESERVED_KEYS, Record, UPDATED_AT_KEY};
use crate::storage::StorageHandle;
use crate::timestamp::Timestamp;

/// Base fields of an entity.
///
/// `id` and the timestamps are always present on freshly created entities.
/// Entities rebuilt from a record only carry what the record carried, so the
/// accessors return `Option`.
#[derive(Clone)]
pub struct Base {
    id: Option<EntityId>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    attributes: BTreeMap<String, Value>,
    storage: StorageHandle,
}

impl Base {
    /// New identity, both timestamps set to the same reading of the clock.
    pub fn fresh(storage: StorageHandle) -> Self {
        let now = Timestamp::now();
        Self {
            id: Some(EntityId::generate()),
            created_at: Some(now),
            updated_at: Some(now),
            attributes: BTreeMap::new(),
            storage,
        }
    }

    /// Rebuild base fields from a record.
    ///
    /// `__class__` is skipped; the caller already picked the concrete type.
    /// Keys other than the reserved ones are copied verbatim into the attribute
    /// table. Missing `id`/timestamps stay missing.
    pub fn from_record(record: &Record, storage: StorageHandle) -> DomainResult<Self> {
        let mut base = Self {
            id: None,
            created_at: None,
            updated_at: None,
            attributes: BTreeMap::new(),
            storage,
        };

        for (key, value) in record {
            match key.as_str() {
                CREATED_AT_KEY => base.created_at = Some(parse_timestamp(key, value)?),
                UPDATED_AT_KEY => base.updated_at = Some(parse_timestamp(key, value)?),
                CLASS_KEY => {}
                ID_KEY => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| DomainError::invalid_id(format!("expected a string, got {value}")))?;
                    base.id = Some(text.parse()?);
                }
                _ => {
                    base.attributes.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(base)
    }

    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn storage(&self) -> &StorageHandle {
        &self.storage
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set an extension attribute, returning the previous value.
    pub fn set(&mut self, key: &str, value: Value) -> DomainResult<Option<Value>> {
        if RESERVED_KEYS.contains(&key) {
            return Err(DomainError::validation(format!("`{key}` is not a writable attribute")));
        }
        Ok(self.attributes.insert(key.to_string(), value))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Move `updated_at` to now, never backwards.
    pub(crate) fn touch(&mut self) {
        let now = Timestamp::now();
        let floor = self.updated_at.max(self.created_at);
        self.updated_at = Some(floor.map_or(now, |f| f.max(now)));
    }

    /// Dictionary form, tagged with `type_name`.
    pub fn to_record(&self, type_name: &str) -> Record {
        let mut record: Record = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(id) = &self.id {
            record.insert(ID_KEY, id.as_str());
        }
        if let Some(ts) = self.created_at {
            record.insert(CREATED_AT_KEY, ts.to_string());
        }
        if let Some(ts) = self.updated_at {
            record.insert(UPDATED_AT_KEY, ts.to_string());
        }
        record.insert(CLASS_KEY, type_name);
        record
    }

    /// `[<TypeName>] (<id>) {<fields>}`.
    pub fn render(&self, type_name: &str, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "[{type_name}] ({id}) {{")?,
            None => write!(f, "[{type_name}] (None) {{")?,
        }

        let mut fields: Vec<(&str, Value)> = Vec::with_capacity(self.attributes.len() + 3);
        if let Some(id) = &self.id {
            fields.push((ID_KEY, Value::from(id.as_str())));
        }
        if let Some(ts) = self.created_at {
            fields.push((CREATED_AT_KEY, Value::from(ts.to_string())));
        }
        if let Some(ts) = self.updated_at {
            fields.push((UPDATED_AT_KEY, Value::from(ts.to_string())));
        }
        fields.extend(self.attributes.iter().map(|(k, v)| (k.as_str(), v.clone())));

        for (idx, (key, value)) in fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", Value::from(*key), value)?;
        }
        f.write_str("}")
    }
}

fn parse_timestamp(field: &str, value: &Value) -> DomainResult<Timestamp> {
    let text = value
        .as_str()
        .ok_or_else(|| DomainError::invalid_timestamp(field, format!("expected a string, got {value}")))?;
    Timestamp::parse_field(field, text)
}

impl PartialEq for Base {
    /// Compares data only; the storage handle is not part of an entity's value.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
            && self.attributes == other.attributes
    }
}

impl core::fmt::Debug for Base {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Base")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}
