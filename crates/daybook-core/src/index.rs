//! Index records: ordered, duplicate-free lists of keys.
//!
//! All three index kinds (entries index, month indexes, index of month
//! indexes) are mutated only through [`IndexManager::append`]. Lists never
//! shrink.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::store::KeyValueStore;

/// Serializes read-modify-write cycles on index records.
///
/// The store has no compare-and-swap, so two appends racing on the same index
/// key could each read the old list and the second write would drop the
/// first value. Appends take a per-key lock for the whole cycle; appends to
/// different keys do not contend.
///
/// Locks are per manager: two `IndexManager`s (and so two `Journal`s) over
/// the same shared store do not serialize against each other, and writers in
/// other processes are not covered at all. The lock table is never evicted
/// and holds one entry per index key touched, which is bounded by the number
/// of months written plus the two top-level indexes.
#[derive(Debug, Default)]
pub struct IndexManager {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an index record. A missing record is an empty list.
    pub fn read<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        index_key: &str,
    ) -> Result<Vec<String>> {
        Ok(store.get_array(index_key)?.unwrap_or_default())
    }

    /// Append `value` to the index stored under `index_key` unless it is
    /// already present.
    ///
    /// Returns `true` if the value was added. The record is written back even
    /// when nothing changed, so a missing record is created as a side effect.
    pub fn append<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        index_key: &str,
        value: &str,
    ) -> Result<bool> {
        let lock = self.lock_for(index_key);
        let _guard = lock.lock();

        let mut index = self.read(store, index_key)?;
        let added = !index.iter().any(|existing| existing == value);
        if added {
            index.push(value.to_string());
        }
        store.set_array(index_key, index)?;

        debug!(target: "daybook::index", index = index_key, value, added, "Appended to index");
        Ok(added)
    }

    fn lock_for(&self, index_key: &str) -> Arc<Mutex<()>> {
        self.locks.entry(index_key.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_missing_index_reads_empty() {
        let store = MemoryStore::new();
        let indexes = IndexManager::new();
        assert!(indexes.read(&store, "entriesIndex").unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let store = MemoryStore::new();
        let indexes = IndexManager::new();
        for key in ["entry.2023-3-15", "entry.2023-3-12", "entry.2023-4-1"] {
            assert!(indexes.append(&store, "entriesIndex", key).unwrap());
        }
        assert_eq!(
            indexes.read(&store, "entriesIndex").unwrap(),
            vec!["entry.2023-3-15", "entry.2023-3-12", "entry.2023-4-1"]
        );
    }

    #[test]
    fn test_append_existing_value_is_noop() {
        let store = MemoryStore::new();
        let indexes = IndexManager::new();
        indexes.append(&store, "monthIndex", "month.2023-3").unwrap();
        assert!(!indexes.append(&store, "monthIndex", "month.2023-3").unwrap());
        assert_eq!(indexes.read(&store, "monthIndex").unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_appends_to_one_key_lose_nothing() {
        let store = MemoryStore::new();
        let indexes = IndexManager::new();

        std::thread::scope(|scope| {
            for thread in 0..8 {
                let store = &store;
                let indexes = &indexes;
                scope.spawn(move || {
                    for i in 0..25 {
                        let value = format!("entry.{}-1-{}", 2000 + thread, i + 1);
                        indexes.append(store, "entriesIndex", &value).unwrap();
                    }
                });
            }
        });

        assert_eq!(indexes.read(&store, "entriesIndex").unwrap().len(), 200);
    }

    proptest! {
        #[test]
        fn prop_repeated_append_keeps_one_copy(times in 1usize..20, value in "[a-z0-9.-]{1,16}") {
            let store = MemoryStore::new();
            let indexes = IndexManager::new();
            for _ in 0..times {
                indexes.append(&store, "idx", &value).unwrap();
            }
            let index = indexes.read(&store, "idx").unwrap();
            prop_assert_eq!(index.iter().filter(|v| **v == value).count(), 1);
            prop_assert_eq!(index.len(), 1);
        }
    }
}
