//! Row type for the `kv` table.

use crate::error::{DaybookError, Result};
use crate::store::types::{StoredValue, ValueKind};

/// Raw `kv` row, before parsing into a [`StoredValue`].
#[derive(Debug)]
pub struct KvRow {
    pub key: String,
    pub kind: String,
    pub value: String,
}

impl KvRow {
    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            kind: row.get(1)?,
            value: row.get(2)?,
        })
    }
}

impl TryFrom<KvRow> for (String, StoredValue) {
    type Error = DaybookError;

    fn try_from(row: KvRow) -> Result<Self> {
        let kind = ValueKind::parse(&row.kind)?;
        let value = StoredValue::decode(kind, &row.value)
            .map_err(|e| DaybookError::Storage(format!("Key {}: {}", row.key, e)))?;
        Ok((row.key, value))
    }
}
