//! In-progress entry state.
//!
//! While an entry is being written, its text, rating and the day editing
//! started are kept under dedicated keys so an interrupted session can be
//! resumed. A draft is discarded by blanking those keys.

use chrono::NaiveDate;

use crate::entry::{Entry, NO_RATING};
use crate::error::{DaybookError, Result};
use crate::store::KeyValueStore;

pub const CURRENT_TEXT_KEY: &str = "currentText";
pub const CURRENT_RATING_KEY: &str = "currentRating";
pub const CURRENT_EDITING_STARTED_KEY: &str = "currentEditingStarted";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub rating: i32,
    /// Day the draft belongs to
    pub editing_started: NaiveDate,
}

impl Draft {
    pub fn new(editing_started: NaiveDate) -> Self {
        Self {
            text: String::new(),
            rating: NO_RATING,
            editing_started,
        }
    }

    /// The entry this draft becomes once committed.
    pub fn to_entry(&self) -> Entry {
        Entry::new(self.editing_started, self.rating, self.text.clone())
    }
}

pub fn save_draft<S: KeyValueStore + ?Sized>(store: &S, draft: &Draft) -> Result<()> {
    store.set_string(CURRENT_TEXT_KEY, &draft.text)?;
    store.set_int(CURRENT_RATING_KEY, i64::from(draft.rating))?;
    store.set_string(
        CURRENT_EDITING_STARTED_KEY,
        &draft.editing_started.format(DATE_FORMAT).to_string(),
    )
}

/// Load the current draft, if one was started.
pub fn load_draft<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Draft>> {
    let started = match store.get_string(CURRENT_EDITING_STARTED_KEY)? {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|e| DaybookError::Storage(format!("Invalid draft date {:?}: {}", raw, e)))?,
        _ => return Ok(None),
    };

    let rating = store
        .get_int(CURRENT_RATING_KEY)?
        .map(i32::try_from)
        .transpose()
        .map_err(|_| DaybookError::Storage("Draft rating out of range".to_string()))?
        .unwrap_or(NO_RATING);

    Ok(Some(Draft {
        text: store.get_string(CURRENT_TEXT_KEY)?.unwrap_or_default(),
        rating,
        editing_started: started,
    }))
}

pub fn discard_draft<S: KeyValueStore + ?Sized>(store: &S) -> Result<()> {
    store.set_string(CURRENT_TEXT_KEY, "")?;
    store.set_int(CURRENT_RATING_KEY, i64::from(NO_RATING))?;
    store.set_string(CURRENT_EDITING_STARTED_KEY, "")
}
