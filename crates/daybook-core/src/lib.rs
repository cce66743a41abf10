//! # Daybook Core
//!
//! Storage and query layer for Daybook, an encrypted daily journal that keeps
//! one rated entry per calendar day.
//!
//! ## Architecture
//!
//! - **store**: key-value store trait, the age-encrypted SQLite backend and
//!   an in-memory backend
//! - **keys**: the persisted key namespace
//! - **index**: duplicate-free index lists with per-key write locking
//! - **journal**: entry reads and writes over the indexes
//! - **query**: in-memory entry filtering
//! - **migrations**: schema versioning and index backfill
//! - **draft**, **settings**, **export**, **integrity**: supporting features
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use daybook_core::{AgeSqliteStore, Entry, EntryFilter, Journal};
//! # fn main() -> daybook_core::Result<()> {
//! let path = std::path::Path::new("journal.daybook");
//! AgeSqliteStore::create(path, "correct horse battery")?;
//! let journal = Journal::open(AgeSqliteStore::open(path, "correct horse battery")?)?;
//!
//! let day = NaiveDate::from_ymd_opt(2023, 3, 12).unwrap();
//! journal.set_entry(&Entry::new(day, 4, "good day"))?;
//! let good = journal.get_entries(&EntryFilter::new().min_rating(3))?;
//! assert_eq!(good.len(), 1);
//!
//! journal.into_store().close()?;
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod draft;
pub mod entry;
pub mod error;
pub mod export;
pub mod fs;
pub mod index;
pub mod integrity;
pub mod journal;
pub mod keys;
pub mod migrations;
pub mod query;
pub mod settings;
pub mod store;

pub use draft::Draft;
pub use entry::{Entry, MAX_RATING, NO_RATING};
pub use error::{DaybookError, Result};
pub use integrity::{IntegrityReport, RepairReport};
pub use journal::Journal;
pub use migrations::{latest_version, MigrationReport};
pub use query::EntryFilter;
pub use settings::Settings;
pub use store::{AgeSqliteStore, KeyValueStore, MemoryStore, StoreMetadata};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
