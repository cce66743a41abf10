//! Value model for the typed key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DaybookError, Result};

/// JSON object stored under a single key (entry records, PIN digests).
pub type Map = serde_json::Map<String, serde_json::Value>;

/// The four value spaces a key can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Map,
    Array,
}

impl ValueKind {
    /// All kinds, in the order exports concatenate them.
    pub const ALL: [ValueKind; 4] = [
        ValueKind::String,
        ValueKind::Number,
        ValueKind::Map,
        ValueKind::Array,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Map => "map",
            ValueKind::Array => "array",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "string" => Ok(ValueKind::String),
            "number" => Ok(ValueKind::Number),
            "map" => Ok(ValueKind::Map),
            "array" => Ok(ValueKind::Array),
            other => Err(DaybookError::Storage(format!(
                "Unknown value kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held by the store.
///
/// Serializes untagged, so an export of `(key, StoredValue)` pairs is the
/// plain JSON value for each key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    String(String),
    Number(i64),
    Map(Map),
    Array(Vec<String>),
}

impl StoredValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            StoredValue::String(_) => ValueKind::String,
            StoredValue::Number(_) => ValueKind::Number,
            StoredValue::Map(_) => ValueKind::Map,
            StoredValue::Array(_) => ValueKind::Array,
        }
    }

    /// Text form used by backends that persist values in a single column.
    pub fn encode(&self) -> Result<String> {
        Ok(match self {
            StoredValue::String(value) => value.clone(),
            StoredValue::Number(value) => value.to_string(),
            StoredValue::Map(value) => serde_json::to_string(value)?,
            StoredValue::Array(value) => serde_json::to_string(value)?,
        })
    }

    /// Inverse of [`StoredValue::encode`].
    pub fn decode(kind: ValueKind, raw: &str) -> Result<Self> {
        match kind {
            ValueKind::String => Ok(StoredValue::String(raw.to_string())),
            ValueKind::Number => raw
                .parse::<i64>()
                .map(StoredValue::Number)
                .map_err(|e| DaybookError::Storage(format!("Invalid number value: {}", e))),
            ValueKind::Map => serde_json::from_str(raw)
                .map(StoredValue::Map)
                .map_err(|e| DaybookError::Storage(format!("Invalid map value: {}", e))),
            ValueKind::Array => serde_json::from_str(raw)
                .map(StoredValue::Array)
                .map_err(|e| DaybookError::Storage(format!("Invalid array value: {}", e))),
        }
    }
}

/// Metadata for an encrypted store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// Random identity assigned when the store was created
    pub store_id: Uuid,

    /// When this store was created
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (informational)
    pub last_modified: DateTime<Utc>,
}
