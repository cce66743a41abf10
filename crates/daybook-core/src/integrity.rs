//! Index consistency checks.
//!
//! Entries are written before their index memberships, so an interrupted
//! write can leave an entry the indexes never learn about. Records can also
//! vanish from under an index when a store is edited by hand. `check` reports
//! both kinds of drift; `repair` only ever adds index members.

use std::collections::{BTreeSet, HashSet};

use tracing::{info, warn};

use crate::error::Result;
use crate::index::IndexManager;
use crate::keys::{
    is_entry_key, month_index_key_from_entry_key, ENTRIES_INDEX_KEY, MONTH_INDEXES_KEY,
};
use crate::migrations::backfill_month_indexes;
use crate::store::{KeyValueStore, ValueKind};

/// Result of [`check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Members of the entries index
    pub entries_indexed: usize,

    /// Indexed entry keys absent from their month index
    pub missing_from_month_index: Vec<String>,

    /// Month index keys absent from the index of month indexes
    pub months_missing_from_month_indexes: Vec<String>,

    /// Indexed entry keys with no stored record
    pub dangling: Vec<String>,

    /// Stored entry records the entries index does not list
    pub orphaned: Vec<String>,

    /// Index keys holding the same member more than once
    pub duplicates: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.missing_from_month_index.is_empty()
            && self.months_missing_from_month_indexes.is_empty()
            && self.dangling.is_empty()
            && self.orphaned.is_empty()
            && self.duplicates.is_empty()
    }
}

/// Result of [`repair`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Orphaned entry keys added to the entries index
    pub reindexed: Vec<String>,

    /// Month index members added
    pub backfilled: usize,
}

/// Compare the indexes against the stored entry records. Read-only.
pub fn check<S: KeyValueStore + ?Sized>(
    store: &S,
    indexes: &IndexManager,
) -> Result<IntegrityReport> {
    let entries_index = indexes.read(store, ENTRIES_INDEX_KEY)?;
    let month_indexes = indexes.read(store, MONTH_INDEXES_KEY)?;

    let stored: BTreeSet<String> = store
        .get_all(ValueKind::Map)?
        .into_iter()
        .map(|(key, _)| key)
        .filter(|key| is_entry_key(key))
        .collect();
    let indexed: HashSet<&str> = entries_index.iter().map(String::as_str).collect();

    let mut report = IntegrityReport {
        entries_indexed: entries_index.len(),
        ..IntegrityReport::default()
    };

    let mut months_checked = HashSet::new();
    for entry_key in &entries_index {
        if !stored.contains(entry_key) {
            report.dangling.push(entry_key.clone());
        }

        let month_key = month_index_key_from_entry_key(entry_key);
        let month = indexes.read(store, &month_key)?;
        if !month.contains(entry_key) {
            report.missing_from_month_index.push(entry_key.clone());
        }

        if months_checked.insert(month_key.clone()) {
            if !month_indexes.contains(&month_key) {
                report.months_missing_from_month_indexes.push(month_key.clone());
            }
            if has_duplicates(&month) {
                report.duplicates.push(month_key);
            }
        }
    }

    report.orphaned = stored
        .into_iter()
        .filter(|key| !indexed.contains(key.as_str()))
        .collect();

    for (key, index) in [
        (ENTRIES_INDEX_KEY, &entries_index),
        (MONTH_INDEXES_KEY, &month_indexes),
    ] {
        if has_duplicates(index) {
            report.duplicates.push(key.to_string());
        }
    }

    if !report.is_clean() {
        warn!(
            target: "daybook::integrity",
            dangling = report.dangling.len(),
            orphaned = report.orphaned.len(),
            missing = report.missing_from_month_index.len(),
            "Journal indexes are inconsistent"
        );
    }

    Ok(report)
}

/// Re-index orphaned entries, then backfill month indexes.
///
/// Dangling references are left in place; index lists never shrink.
pub fn repair<S: KeyValueStore + ?Sized>(
    store: &S,
    indexes: &IndexManager,
) -> Result<RepairReport> {
    let orphaned = check(store, indexes)?.orphaned;

    let mut reindexed = Vec::new();
    for entry_key in orphaned {
        if indexes.append(store, ENTRIES_INDEX_KEY, &entry_key)? {
            reindexed.push(entry_key);
        }
    }
    let backfilled = backfill_month_indexes(store, indexes)?;

    info!(
        target: "daybook::integrity",
        reindexed = reindexed.len(),
        backfilled,
        "Repaired journal indexes"
    );

    Ok(RepairReport {
        reindexed,
        backfilled,
    })
}

fn has_duplicates(index: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(index.len());
    !index.iter().all(|member| seen.insert(member))
}
