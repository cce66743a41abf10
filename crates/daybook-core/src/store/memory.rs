//! In-process store without encryption or persistence.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::traits::KeyValueStore;
use super::types::{StoredValue, ValueKind};
use crate::error::Result;

/// Unencrypted, in-memory [`KeyValueStore`].
///
/// Semantics match the encrypted store key for key; useful for tests and for
/// callers that handle persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_value(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: StoredValue) -> Result<()> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn get_all(&self, kind: ValueKind) -> Result<Vec<(String, StoredValue)>> {
        Ok(self
            .values
            .read()
            .iter()
            .filter(|(_, value)| value.kind() == kind)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn clear_store(&self) -> Result<()> {
        self.values.write().clear();
        Ok(())
    }
}
