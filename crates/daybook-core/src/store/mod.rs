//! Storage layer for Daybook.
//!
//! The journal core talks to a flat, typed key-value store
//! ([`KeyValueStore`]). Two backends exist:
//!
//! - [`AgeSqliteStore`]: SQLite held in memory, persisted as a single
//!   age-encrypted file. This is the store used for real journals.
//! - [`MemoryStore`]: unencrypted and in-process.
//!
//! Confidentiality is the store's job; nothing above this layer encrypts.

pub mod age_sqlite;
pub mod encryption;
pub mod memory;
pub mod traits;
pub mod types;

pub use age_sqlite::AgeSqliteStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
pub use types::{Map, StoreMetadata, StoredValue, ValueKind};
