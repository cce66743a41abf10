//! Schema migrations for journal stores.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The schema marker (`schema` key) holds the latest applied version, or is
//!   absent for stores written before versioning existed.
//! - Every migration is idempotent; re-running one must not duplicate index
//!   members.

use std::collections::HashSet;

use tracing::info;

use crate::error::{DaybookError, Result};
use crate::index::IndexManager;
use crate::keys::{
    month_index_key_from_entry_key, ENTRIES_INDEX_KEY, MONTH_INDEXES_KEY, SCHEMA_VERSION_KEY,
};
use crate::store::KeyValueStore;

type MigrationFn = fn(&dyn KeyValueStore, &IndexManager) -> Result<usize>;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    description: &'static str,
    apply: MigrationFn,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "backfill month indexes",
    apply: backfill_v1,
}];

fn backfill_v1(store: &dyn KeyValueStore, indexes: &IndexManager) -> Result<usize> {
    backfill_month_indexes(store, indexes)
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Marker found at startup (`None` for pre-versioning stores)
    pub from: Option<i64>,

    /// Marker written after the run
    pub to: u32,

    /// Versions applied during this run, in order
    pub applied: Vec<u32>,

    /// Index members added by the applied migrations
    pub backfilled: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Returns the latest schema version known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Bring the store up to the latest schema version.
///
/// Applies every migration newer than the stored marker, then writes the
/// marker. The marker is written even when nothing was applied.
///
/// # Errors
///
/// - `UnsupportedSchemaVersion` if the marker is newer than this build; the
///   marker is left untouched
/// - any store error raised while reading or backfilling
pub fn run_migrations<S: KeyValueStore>(
    store: &S,
    indexes: &IndexManager,
) -> Result<MigrationReport> {
    let stored = store.get_int(SCHEMA_VERSION_KEY)?;
    let latest = latest_version();

    if let Some(version) = stored {
        if version > i64::from(latest) {
            return Err(DaybookError::UnsupportedSchemaVersion {
                stored: version,
                latest,
            });
        }
    }

    let current = stored.unwrap_or(0);
    let mut applied = Vec::new();
    let mut backfilled = 0;
    for migration in MIGRATIONS {
        if i64::from(migration.version) <= current {
            continue;
        }

        info!(
            target: "daybook::migrations",
            version = migration.version,
            description = migration.description,
            "Upgrading journal schema"
        );
        backfilled += (migration.apply)(store as &dyn KeyValueStore, indexes)?;
        applied.push(migration.version);
    }

    store.set_int(SCHEMA_VERSION_KEY, i64::from(latest))?;

    if !applied.is_empty() {
        info!(
            target: "daybook::migrations",
            from = ?stored,
            to = latest,
            backfilled,
            "Journal schema upgraded"
        );
    }

    Ok(MigrationReport {
        from: stored,
        to: latest,
        applied,
        backfilled,
    })
}

/// v1: file every indexed entry key into its month index and every month
/// index key into the index of month indexes.
///
/// Returns how many index members were added. Also used by integrity repair.
pub fn backfill_month_indexes<S: KeyValueStore + ?Sized>(
    store: &S,
    indexes: &IndexManager,
) -> Result<usize> {
    let mut added = 0;
    let mut months_seen = HashSet::new();

    for entry_key in indexes.read(store, ENTRIES_INDEX_KEY)? {
        let month_key = month_index_key_from_entry_key(&entry_key);
        if indexes.append(store, &month_key, &entry_key)? {
            added += 1;
        }
        if months_seen.insert(month_key.clone())
            && indexes.append(store, MONTH_INDEXES_KEY, &month_key)?
        {
            added += 1;
        }
    }

    Ok(added)
}
