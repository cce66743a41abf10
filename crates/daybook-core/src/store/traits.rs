//! Typed key-value store interface.
//!
//! The journal core only needs a flat namespace of string keys where each key
//! holds a string, an integer, a JSON object or a list of strings. Backends
//! implement the untyped primitives; the typed accessors are provided.

use super::types::{Map, StoredValue, ValueKind};
use crate::error::{DaybookError, Result};

/// Key-value store consumed by the journal core.
///
/// Implementations must ensure:
/// - A key holds exactly one value; writing a key replaces it, whatever kind
///   it held before
/// - Absent keys read as `Ok(None)`, never as an error
/// - Backend failures are returned as errors, never swallowed
///
/// Methods take `&self`; backends provide their own interior locking so one
/// store can be shared across threads.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get_value(&self, key: &str) -> Result<Option<StoredValue>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: StoredValue) -> Result<()>;

    /// Every key of the given kind with its value, ordered by key.
    fn get_all(&self, kind: ValueKind) -> Result<Vec<(String, StoredValue)>>;

    /// Remove every key of every kind. Irreversible.
    fn clear_store(&self) -> Result<()>;

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_value(key)? {
            None => Ok(None),
            Some(StoredValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(kind_mismatch(key, ValueKind::String, &other)),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, StoredValue::String(value.to_string()))
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get_value(key)? {
            None => Ok(None),
            Some(StoredValue::Number(value)) => Ok(Some(value)),
            Some(other) => Err(kind_mismatch(key, ValueKind::Number, &other)),
        }
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.set_value(key, StoredValue::Number(value))
    }

    fn get_map(&self, key: &str) -> Result<Option<Map>> {
        match self.get_value(key)? {
            None => Ok(None),
            Some(StoredValue::Map(value)) => Ok(Some(value)),
            Some(other) => Err(kind_mismatch(key, ValueKind::Map, &other)),
        }
    }

    fn set_map(&self, key: &str, value: Map) -> Result<()> {
        self.set_value(key, StoredValue::Map(value))
    }

    fn get_array(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get_value(key)? {
            None => Ok(None),
            Some(StoredValue::Array(value)) => Ok(Some(value)),
            Some(other) => Err(kind_mismatch(key, ValueKind::Array, &other)),
        }
    }

    fn set_array(&self, key: &str, value: Vec<String>) -> Result<()> {
        self.set_value(key, StoredValue::Array(value))
    }
}

fn kind_mismatch(key: &str, expected: ValueKind, found: &StoredValue) -> DaybookError {
    DaybookError::Storage(format!(
        "Key {} holds a {} value, expected {}",
        key,
        found.kind(),
        expected
    ))
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_value(&self, key: &str) -> Result<Option<StoredValue>> {
        (**self).get_value(key)
    }

    fn set_value(&self, key: &str, value: StoredValue) -> Result<()> {
        (**self).set_value(key, value)
    }

    fn get_all(&self, kind: ValueKind) -> Result<Vec<(String, StoredValue)>> {
        (**self).get_all(kind)
    }

    fn clear_store(&self) -> Result<()> {
        (**self).clear_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn(_store: &dyn KeyValueStore) {}
        _accepts_dyn(&MemoryStore::new());
    }

    #[test]
    fn test_typed_accessor_rejects_other_kind() {
        let store = MemoryStore::new();
        store.set_int("schema", 1).unwrap();

        let err = store.get_array("schema").unwrap_err();
        assert!(err.to_string().contains("holds a number value"));
        assert_eq!(store.get_int("schema").unwrap(), Some(1));
    }

    #[test]
    fn test_absent_key_reads_none_for_every_kind() {
        let store = MemoryStore::new();
        assert!(store.get_string("missing").unwrap().is_none());
        assert!(store.get_int("missing").unwrap().is_none());
        assert!(store.get_map("missing").unwrap().is_none());
        assert!(store.get_array("missing").unwrap().is_none());
    }
}
