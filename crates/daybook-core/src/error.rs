//! Error types for Daybook core operations.
//!
//! Store failures propagate to the caller as `DaybookError`. Read paths that
//! can degrade (missing entries, malformed legacy keys) do not produce errors;
//! see the `journal` and `keys` modules.

use thiserror::Error;

/// Result type alias for Daybook operations.
pub type Result<T> = std::result::Result<T, DaybookError>;

/// Core error type for Daybook operations.
#[derive(Debug, Error)]
pub enum DaybookError {
    /// Incorrect passphrase during decryption
    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    /// Store file not found
    #[error("Journal store not found")]
    StoreNotFound,

    /// Encryption or decryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// The stored schema marker is newer than this build understands
    #[error("Schema version {stored} is newer than the latest supported version {latest}")]
    UnsupportedSchemaVersion { stored: i64, latest: u32 },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
