//! Journal entry model and its stored record form.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, Result};
use crate::keys::date_from_entry_key;
use crate::store::Map;

/// Highest rating an entry may carry.
pub const MAX_RATING: i32 = 5;

/// Rating of an entry that has not been rated (and of the sentinel entry).
pub const NO_RATING: i32 = -1;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day's journal record.
///
/// Identity is the calendar day: writing a second entry for the same day
/// replaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// `-1` (unrated) up to [`MAX_RATING`]
    pub rating: i32,

    /// Free text; may be empty
    pub text: String,

    /// Calendar day this entry belongs to
    pub date: NaiveDate,
}

impl Entry {
    pub fn new(date: NaiveDate, rating: i32, text: impl Into<String>) -> Self {
        Self {
            rating,
            text: text.into(),
            date,
        }
    }

    /// The sentinel substituted for an index reference whose entry is gone:
    /// rating -1, empty text, dated 1970-01-01.
    pub fn empty() -> Self {
        Self {
            rating: NO_RATING,
            text: String::new(),
            date: NaiveDate::default(),
        }
    }

    pub fn is_empty_sentinel(&self) -> bool {
        *self == Self::empty()
    }

    /// Check the rating range before the entry is written.
    pub fn validate(&self) -> Result<()> {
        if !(NO_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(DaybookError::Validation(format!(
                "Rating must be between {} and {} (got {})",
                NO_RATING, MAX_RATING, self.rating
            )));
        }
        Ok(())
    }

    /// Map form written to the store.
    pub(crate) fn to_record(&self) -> Map {
        let mut map = Map::new();
        map.insert("rating".to_string(), self.rating.into());
        map.insert("text".to_string(), self.text.clone().into());
        map.insert(
            "date".to_string(),
            self.date.format(DATE_FORMAT).to_string().into(),
        );
        map
    }

    /// Parse a stored map back into an entry, normalizing the date to a
    /// calendar day.
    pub(crate) fn from_record(key: &str, map: Map) -> Result<Self> {
        let record: EntryRecord = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| DaybookError::Storage(format!("Invalid entry record {}: {}", key, e)))?;
        let rating = i32::try_from(record.rating).map_err(|_| {
            DaybookError::Storage(format!(
                "Invalid entry record {}: rating out of range: {}",
                key, record.rating
            ))
        })?;
        let date = parse_stored_date(key, &record.date)
            .map_err(|e| DaybookError::Storage(format!("Invalid entry record {}: {}", key, e)))?;

        Ok(Entry {
            rating,
            text: record.text,
            date,
        })
    }
}

/// Raw stored record, before validation.
#[derive(Debug, Deserialize)]
struct EntryRecord {
    rating: i64,
    text: String,
    date: String,
}

/// Stored dates are `YYYY-MM-DD`. Older records hold a UTC timestamp of the
/// local midnight the entry was written for, which can fall on the previous
/// UTC day. The key names the day those records belong to; the timestamp's
/// own day is used only when the key does not parse.
fn parse_stored_date(key: &str, raw: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date);
    }
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| DaybookError::Validation(format!("Invalid date {:?}: {}", raw, e)))?;
    Ok(date_from_entry_key(key).unwrap_or_else(|| timestamp.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_round_trip() {
        let entry = Entry::new(day(2023, 3, 12), 4, "good day");
        let record = entry.to_record();
        assert_eq!(record["date"], "2023-03-12");
        assert_eq!(Entry::from_record("entry.2023-3-12", record).unwrap(), entry);
    }

    #[test]
    fn test_legacy_timestamp_takes_day_from_key() {
        let mut map = Map::new();
        map.insert("rating".into(), 2.into());
        map.insert("text".into(), "bad day".into());
        map.insert("date".into(), "2023-03-14T22:00:00.000Z".into());

        let entry = Entry::from_record("entry.2023-3-15", map).unwrap();
        assert_eq!(entry.date, day(2023, 3, 15));
    }

    #[test]
    fn test_legacy_timestamp_under_unparsable_key_uses_timestamp() {
        let mut map = Map::new();
        map.insert("rating".into(), 2.into());
        map.insert("text".into(), "bad day".into());
        map.insert("date".into(), "2023-03-14T22:00:00.000Z".into());

        let entry = Entry::from_record("entry.2023-3", map).unwrap();
        assert_eq!(entry.date, day(2023, 3, 14));
    }

    #[test]
    fn test_unparsable_date_is_storage_error() {
        let mut map = Map::new();
        map.insert("rating".into(), 2.into());
        map.insert("text".into(), "bad day".into());
        map.insert("date".into(), "yesterday".into());

        let err = Entry::from_record("entry.2023-3-15", map).unwrap_err();
        assert!(matches!(err, DaybookError::Storage(_)));
    }

    #[test]
    fn test_record_missing_text_is_storage_error() {
        let mut map = Map::new();
        map.insert("rating".into(), 2.into());
        map.insert("date".into(), "2023-03-15".into());

        let err = Entry::from_record("entry.2023-3-15", map).unwrap_err();
        assert!(matches!(err, DaybookError::Storage(_)));
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Entry::new(day(2023, 1, 1), -1, "").validate().is_ok());
        assert!(Entry::new(day(2023, 1, 1), 0, "").validate().is_ok());
        assert!(Entry::new(day(2023, 1, 1), MAX_RATING, "").validate().is_ok());
        assert!(Entry::new(day(2023, 1, 1), MAX_RATING + 1, "").validate().is_err());
        assert!(Entry::new(day(2023, 1, 1), -2, "").validate().is_err());
    }

    #[test]
    fn test_sentinel() {
        let sentinel = Entry::empty();
        assert_eq!(sentinel.rating, -1);
        assert!(sentinel.text.is_empty());
        assert_eq!(sentinel.date, day(1970, 1, 1));
        assert!(sentinel.is_empty_sentinel());
        assert!(!Entry::new(day(1970, 1, 1), -1, "x").is_empty_sentinel());
    }
}
