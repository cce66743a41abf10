//! Age-encrypted SQLite key-value store.
//!
//! The database lives in memory while the store is open. `persist` and
//! `close` serialize it, encrypt it with the store passphrase and replace the
//! file on disk atomically.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard};

use age::secrecy::SecretString;
use chrono::{DateTime, Utc};
use rusqlite::serialize::OwnedData;
use rusqlite::{Connection, DatabaseName, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use crate::crypto::validate_passphrase;
use crate::error::{DaybookError, Result};
use crate::store::encryption::{decrypt, encrypt};
use crate::store::traits::KeyValueStore;
use crate::store::types::{StoreMetadata, StoredValue, ValueKind};

use row::KvRow;

/// On-disk format version written to the `meta` table.
pub const FORMAT_VERSION: &str = "0.1";

const SCHEMA_SQL: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE kv (
        key TEXT PRIMARY KEY,
        kind TEXT NOT NULL CHECK (kind IN ('string', 'number', 'map', 'array')),
        value TEXT NOT NULL
    );
"#;

/// Age-encrypted SQLite store.
pub struct AgeSqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
    store_id: Uuid,
    // Kept to re-encrypt on persist/close.
    passphrase: SecretString,
}

impl std::fmt::Debug for AgeSqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgeSqliteStore")
            .field("path", &self.path)
            .field("store_id", &self.store_id)
            .finish_non_exhaustive()
    }
}

impl AgeSqliteStore {
    /// Create a new, empty encrypted store at `path`.
    ///
    /// Returns the random store ID recorded in the store metadata.
    ///
    /// # Errors
    ///
    /// - `Storage` if a file already exists at `path`
    /// - `InvalidInput` if the passphrase is too weak
    /// - `Io`/`Crypto` if the file cannot be written
    pub fn create(path: &Path, passphrase: &str) -> Result<Uuid> {
        if path.exists() {
            return Err(DaybookError::Storage(format!(
                "Store file already exists: {}",
                path.display()
            )));
        }
        validate_passphrase(passphrase)?;

        let store_id = Uuid::new_v4();
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;

        let now = Utc::now().to_rfc3339();
        let store_id_str = store_id.to_string();
        for (key, value) in [
            ("format_version", FORMAT_VERSION),
            ("store_id", store_id_str.as_str()),
            ("created_at", now.as_str()),
            ("last_modified", now.as_str()),
        ] {
            conn.execute("INSERT INTO meta (key, value) VALUES (?, ?)", [key, value])?;
        }

        let secret = SecretString::from(passphrase.to_string());
        Self::write_encrypted(path, &conn, &secret)?;
        info!(target: "daybook::store", path = %path.display(), %store_id, "Created encrypted store");

        Ok(store_id)
    }

    /// Open an existing encrypted store.
    ///
    /// # Errors
    ///
    /// - `StoreNotFound` if `path` does not exist
    /// - `IncorrectPassphrase` if the passphrase does not decrypt the file
    /// - `Crypto`/`Sqlite` if the file is corrupted
    pub fn open(path: &Path, passphrase: &str) -> Result<Self> {
        if !path.exists() {
            return Err(DaybookError::StoreNotFound);
        }
        validate_passphrase(passphrase)?;

        let secret = SecretString::from(passphrase.to_string());
        let encrypted = fs::read(path)?;
        let plaintext = decrypt(&encrypted, &secret)?;

        let mut conn = Connection::open_in_memory()?;
        conn.deserialize(DatabaseName::Main, Self::owned_data_from_bytes(&plaintext)?, false)?;

        let store_id_str: String = conn
            .query_row("SELECT value FROM meta WHERE key = 'store_id'", [], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| DaybookError::Storage("Store metadata missing store_id".to_string()))?;
        let store_id = Uuid::parse_str(&store_id_str)
            .map_err(|e| DaybookError::Storage(format!("Invalid store_id in metadata: {}", e)))?;

        info!(target: "daybook::store", path = %path.display(), %store_id, "Opened encrypted store");

        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
            store_id,
            passphrase: secret,
        })
    }

    /// Path of the encrypted file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_id(&self) -> Uuid {
        self.store_id
    }

    /// Encrypt the current state and write it to disk, keeping the store open.
    pub fn persist(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        Self::write_encrypted(&self.path, &conn, &self.passphrase)
    }

    /// Persist and release the store.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;
        Self::write_encrypted(&self.path, &conn, &self.passphrase)?;
        info!(target: "daybook::store", path = %self.path.display(), "Closed encrypted store");
        Ok(())
    }

    /// Store metadata from the `meta` table.
    pub fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;
        let meta_value = |key: &str| -> Result<String> {
            conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?
            .ok_or_else(|| DaybookError::Storage(format!("Store metadata missing {}", key)))
        };
        let timestamp = |key: &str| -> Result<DateTime<Utc>> {
            let raw = meta_value(key)?;
            DateTime::parse_from_rfc3339(&raw)
                .map(|value| value.with_timezone(&Utc))
                .map_err(|e| DaybookError::Storage(format!("Invalid {} timestamp: {}", key, e)))
        };

        Ok(StoreMetadata {
            format_version: meta_value("format_version")?,
            store_id: self.store_id,
            created_at: timestamp("created_at")?,
            last_modified: timestamp("last_modified")?,
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))
    }

    fn write_encrypted(path: &Path, conn: &Connection, passphrase: &SecretString) -> Result<()> {
        let data = conn.serialize(DatabaseName::Main)?;
        let encrypted = encrypt(&data, passphrase)?;
        crate::fs::write_atomic(path, &encrypted)
            .map_err(|e| DaybookError::Storage(format!("Failed to write store: {}", e)))
    }

    fn touch(conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        if bytes.is_empty() {
            return Err(DaybookError::Storage("SQLite payload is empty".to_string()));
        }

        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| DaybookError::Storage("SQLite payload too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns either null (checked below) or a
        // buffer of exactly `size` bytes.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| DaybookError::Storage("SQLite allocation failed".to_string()))?;

        // SAFETY: `ptr` points to a fresh allocation of `bytes.len()` bytes that
        // cannot overlap `bytes`. OwnedData takes ownership of the sqlite3
        // allocation and frees it through SQLite.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }
}

impl KeyValueStore for AgeSqliteStore {
    fn get_value(&self, key: &str) -> Result<Option<StoredValue>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                "SELECT key, kind, value FROM kv WHERE key = ?",
                [key],
                KvRow::from_sql,
            )
            .optional()?;

        match row {
            Some(row) => {
                let (_, value): (String, StoredValue) = row.try_into()?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set_value(&self, key: &str, value: StoredValue) -> Result<()> {
        let encoded = value.encode()?;
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO kv (key, kind, value) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET kind = excluded.kind, value = excluded.value
            "#,
            (key, value.kind().as_str(), encoded),
        )?;
        Self::touch(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn get_all(&self, kind: ValueKind) -> Result<Vec<(String, StoredValue)>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT key, kind, value FROM kv WHERE kind = ? ORDER BY key")?;
        let rows = stmt.query_map([kind.as_str()], KvRow::from_sql)?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?.try_into()?);
        }
        Ok(values)
    }

    fn clear_store(&self) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM kv", [])?;
        Self::touch(&tx)?;
        tx.commit()?;
        info!(target: "daybook::store", removed, "Cleared store");
        Ok(())
    }
}
