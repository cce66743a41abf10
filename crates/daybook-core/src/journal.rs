//! Entry repository.
//!
//! [`Journal`] is the handle the rest of the app talks to. Opening one brings
//! the store's schema up to date; every write keeps the three index kinds in
//! step with the entry records.

use chrono::Datelike;
use tracing::{debug, warn};

use crate::draft::{self, Draft};
use crate::entry::Entry;
use crate::error::Result;
use crate::export;
use crate::index::IndexManager;
use crate::integrity::{self, IntegrityReport, RepairReport};
use crate::keys::{entry_key, month_index_key, ENTRIES_INDEX_KEY, MONTH_INDEXES_KEY};
use crate::migrations::{run_migrations, MigrationReport};
use crate::query::EntryFilter;
use crate::store::KeyValueStore;

/// Journal over a key-value store.
#[derive(Debug)]
pub struct Journal<S> {
    store: S,
    indexes: IndexManager,
    migration: MigrationReport,
}

impl<S: KeyValueStore> Journal<S> {
    /// Open a journal, applying any pending schema migrations first.
    ///
    /// # Errors
    ///
    /// `UnsupportedSchemaVersion` if the store was written by a newer build.
    pub fn open(store: S) -> Result<Self> {
        let indexes = IndexManager::new();
        let migration = run_migrations(&store, &indexes)?;
        Ok(Self {
            store,
            indexes,
            migration,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// What the migration run at open time did.
    pub fn migration_report(&self) -> &MigrationReport {
        &self.migration
    }

    /// Write `entry`, replacing any entry for the same day.
    ///
    /// The record is written first, then the entries index, the month index
    /// and the index of month indexes, in that order.
    pub fn set_entry(&self, entry: &Entry) -> Result<()> {
        entry.validate()?;

        let key = entry_key(&entry.date);
        let month_key = month_index_key(&entry.date);

        self.store.set_map(&key, entry.to_record())?;
        self.indexes.append(&self.store, ENTRIES_INDEX_KEY, &key)?;
        self.indexes.append(&self.store, &month_key, &key)?;
        self.indexes
            .append(&self.store, MONTH_INDEXES_KEY, &month_key)?;

        debug!(target: "daybook::journal", key = %key, rating = entry.rating, "Entry written");
        Ok(())
    }

    /// The entry for `date`'s calendar day, if one was written.
    pub fn get_entry<D: Datelike>(&self, date: &D) -> Result<Option<Entry>> {
        let key = entry_key(date);
        self.store
            .get_map(&key)?
            .map(|record| Entry::from_record(&key, record))
            .transpose()
    }

    /// Every indexed entry matching `filter`, in first-write order.
    ///
    /// An index member whose record is gone yields [`Entry::empty`] in its
    /// place rather than failing the whole read.
    pub fn get_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let keys = self.indexes.read(&self.store, ENTRIES_INDEX_KEY)?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            match self.store.get_map(&key)? {
                Some(record) => entries.push(Entry::from_record(&key, record)?),
                None => {
                    warn!(target: "daybook::journal", key = %key, "Indexed entry is missing");
                    entries.push(Entry::empty());
                }
            }
        }

        Ok(filter.apply(entries))
    }

    /// Delete everything in the store, including the schema marker.
    pub fn clear(&self) -> Result<()> {
        self.store.clear_store()?;
        warn!(target: "daybook::journal", "Journal cleared");
        Ok(())
    }

    /// Whole store as a JSON object string.
    pub fn dump(&self) -> Result<String> {
        export::dump_json(&self.store)
    }

    pub fn save_draft(&self, draft: &Draft) -> Result<()> {
        draft::save_draft(&self.store, draft)
    }

    pub fn load_draft(&self) -> Result<Option<Draft>> {
        draft::load_draft(&self.store)
    }

    pub fn discard_draft(&self) -> Result<()> {
        draft::discard_draft(&self.store)
    }

    /// Write the current draft as an entry and discard it.
    ///
    /// Returns the committed entry, or `None` if there was no draft.
    pub fn commit_draft(&self) -> Result<Option<Entry>> {
        let Some(draft) = self.load_draft()? else {
            return Ok(None);
        };
        let entry = draft.to_entry();
        self.set_entry(&entry)?;
        self.discard_draft()?;
        Ok(Some(entry))
    }

    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        integrity::check(&self.store, &self.indexes)
    }

    pub fn repair(&self) -> Result<RepairReport> {
        integrity::repair(&self.store, &self.indexes)
    }
}
