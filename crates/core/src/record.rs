//! Serialized form of an entity: a flat field-name -> JSON value mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator field naming the concrete entity type.
pub const CLASS_KEY: &str = "__class__";
pub const ID_KEY: &str = "id";
pub const CREATED_AT_KEY: &str = "created_at";
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Keys owned by the entity itself; extension attributes may not use them.
pub const RESERVED_KEYS: [&str; 4] = [ID_KEY, CREATED_AT_KEY, UPDATED_AT_KEY, CLASS_KEY];

/// Dictionary form of an entity.
///
/// Every value is plain JSON; `created_at`/`updated_at` hold ISO-8601 strings
/// and `__class__` holds the concrete type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Value of the discriminator, when present and textual.
    pub fn class_name(&self) -> Option<&str> {
        self.0.get(CLASS_KEY).and_then(Value::as_str)
    }

    /// Identifier, when present and textual.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY).and_then(Value::as_str)
    }

    /// Storage key `<TypeName>.<id>`, when both parts are present.
    pub fn storage_key(&self) -> Option<String> {
        Some(format!("{}.{}", self.class_name()?, self.id()?))
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Object(value.0)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn storage_key_joins_class_and_id() {
        let r = record(json!({ "__class__": "BaseModel", "id": "42" }));
        assert_eq!(r.storage_key().as_deref(), Some("BaseModel.42"));
    }

    #[test]
    fn storage_key_requires_both_parts() {
        assert_eq!(record(json!({ "id": "42" })).storage_key(), None);
        assert_eq!(record(json!({ "__class__": "BaseModel" })).storage_key(), None);
        assert_eq!(
            record(json!({ "__class__": "BaseModel", "id": 42 })).storage_key(),
            None
        );
    }

    #[test]
    fn serializes_as_plain_object() {
        let r = record(json!({ "name": "x", "n": 1 }));
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({ "name": "x", "n": 1 }));
    }
}
