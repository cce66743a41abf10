//! Store key derivation.
//!
//! Persisted key namespace, stable across versions:
//!
//! | key                     | kind   | contents                         |
//! |-------------------------|--------|----------------------------------|
//! | `entry.<y>-<m>-<d>`     | map    | one day's entry                  |
//! | `month.<y>-<m>`         | array  | entry keys for that month        |
//! | `entriesIndex`          | array  | every entry key ever written     |
//! | `monthIndex`            | array  | every month index key            |
//! | `schema`                | number | last applied migration version   |
//!
//! Month and day components are not zero padded (`entry.2023-3-12`). The
//! `-` separator keeps `2023-1-11` and `2023-11-1` apart.

use chrono::{Datelike, NaiveDate};
use tracing::error;

pub const ENTRY_KEY_PREFIX: &str = "entry";
pub const MONTH_INDEX_KEY_PREFIX: &str = "month";
pub const ENTRIES_INDEX_KEY: &str = "entriesIndex";
/// Index of all month indexes.
pub const MONTH_INDEXES_KEY: &str = "monthIndex";
pub const SCHEMA_VERSION_KEY: &str = "schema";

/// Key of the entry for `date`'s calendar day.
///
/// Only year, month and day are read, so any time of day or offset carried
/// by `date` is ignored; the calendar day is the one `date` itself reports.
pub fn entry_key<D: Datelike>(date: &D) -> String {
    format!(
        "{}.{}-{}-{}",
        ENTRY_KEY_PREFIX,
        date.year(),
        date.month(),
        date.day()
    )
}

/// Key of the month index that `date`'s entry belongs to.
pub fn month_index_key<D: Datelike>(date: &D) -> String {
    format!("{}.{}-{}", MONTH_INDEX_KEY_PREFIX, date.year(), date.month())
}

/// Whether `key` lives in the entry namespace.
pub fn is_entry_key(key: &str) -> bool {
    key.strip_prefix(ENTRY_KEY_PREFIX)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Derive the month index key from an entry key.
///
/// Used when rebuilding indexes from stored entry keys, which may predate the
/// current key format. A key that is not of the form `entry.<y>-<m>-<d>` is
/// logged and a best-effort key is still returned: the last `-` component of
/// whatever follows the first `.` is dropped.
pub fn month_index_key_from_entry_key(entry_key: &str) -> String {
    let parts: Vec<&str> = entry_key.split('.').collect();
    if parts.len() != 2 {
        error!(target: "daybook::keys", key = entry_key, "Entry key is not of correct form");
    }
    let date = parts.get(1).copied().unwrap_or_default();

    let mut components: Vec<&str> = date.split('-').collect();
    if components.len() != 3 {
        error!(target: "daybook::keys", key = entry_key, "Entry key is not of correct form");
    }
    components.pop();

    format!("{}.{}", MONTH_INDEX_KEY_PREFIX, components.join("-"))
}

/// Calendar day named by an `entry.<y>-<m>-<d>` key, or `None` if the key is
/// not of that form or names no real day.
pub fn date_from_entry_key(entry_key: &str) -> Option<NaiveDate> {
    let date = entry_key
        .strip_prefix(ENTRY_KEY_PREFIX)?
        .strip_prefix('.')?;
    let mut components = date.split('-');
    let year = components.next()?.parse().ok()?;
    let month = components.next()?.parse().ok()?;
    let day = components.next()?.parse().ok()?;
    if components.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_key_format() {
        assert_eq!(entry_key(&day(2023, 3, 12)), "entry.2023-3-12");
        assert_eq!(entry_key(&day(2023, 11, 1)), "entry.2023-11-1");
        assert_eq!(month_index_key(&day(2023, 3, 12)), "month.2023-3");
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let morning = day(2023, 3, 12).and_hms_opt(0, 0, 1).unwrap();
        let night = day(2023, 3, 12).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(entry_key(&morning), entry_key(&night));

        let offset = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2023, 3, 12, 1, 0, 0).unwrap();
        assert_eq!(entry_key(&local), "entry.2023-3-12");
    }

    #[test]
    fn test_inverse_of_well_formed_key() {
        assert_eq!(
            month_index_key_from_entry_key("entry.2023-3-12"),
            "month.2023-3"
        );
        assert_eq!(
            month_index_key_from_entry_key("entry.1999-12-31"),
            "month.1999-12"
        );
    }

    #[test]
    fn test_inverse_of_malformed_key_is_best_effort() {
        assert_eq!(month_index_key_from_entry_key("entry.2023-3"), "month.2023");
        assert_eq!(month_index_key_from_entry_key("garbage"), "month.");
        assert_eq!(
            month_index_key_from_entry_key("entry.2023-3-12.bak"),
            "month.2023-3"
        );
    }

    #[test]
    fn test_is_entry_key() {
        assert!(is_entry_key("entry.2023-3-12"));
        assert!(!is_entry_key("entriesIndex"));
        assert!(!is_entry_key("month.2023-3"));
    }

    #[test]
    fn test_date_from_entry_key() {
        assert_eq!(date_from_entry_key("entry.2023-3-15"), Some(day(2023, 3, 15)));
        assert_eq!(date_from_entry_key("entry.2023-03-05"), Some(day(2023, 3, 5)));
        assert_eq!(date_from_entry_key("entry.2023-2-30"), None);
        assert_eq!(date_from_entry_key("entry.2023-3"), None);
        assert_eq!(date_from_entry_key("entry.2023-3-12-1"), None);
        assert_eq!(date_from_entry_key("month.2023-3-12"), None);
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1i32..=9999, 0u32..366).prop_filter_map("valid ordinal", |(year, ordinal)| {
            NaiveDate::from_yo_opt(year, ordinal + 1)
        })
    }

    proptest! {
        #[test]
        fn prop_distinct_days_have_distinct_keys(a in any_date(), b in any_date()) {
            prop_assert_eq!(a == b, entry_key(&a) == entry_key(&b));
        }

        #[test]
        fn prop_inverse_matches_month_index_key(date in any_date()) {
            prop_assert_eq!(
                month_index_key_from_entry_key(&entry_key(&date)),
                month_index_key(&date)
            );
        }

        #[test]
        fn prop_entry_key_names_its_own_day(date in any_date()) {
            prop_assert_eq!(date_from_entry_key(&entry_key(&date)), Some(date));
        }
    }
}
