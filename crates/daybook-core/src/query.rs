//! Entry filtering.
//!
//! Filtering runs in memory over entries already loaded through the entries
//! index. Each predicate narrows the set independently, so the fixed order
//! only affects how much work later predicates do.

use chrono::NaiveDate;

use crate::entry::Entry;

/// Filter for [`crate::Journal::get_entries`].
///
/// Every field is optional and an unset field imposes no constraint. A
/// rating bound of `0` is a real bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Earliest day (inclusive)
    pub min_date: Option<NaiveDate>,

    /// Latest day (inclusive)
    pub max_date: Option<NaiveDate>,

    /// Lowest rating (inclusive)
    pub min_rating: Option<i32>,

    /// Highest rating (inclusive)
    pub max_rating: Option<i32>,

    /// Case-insensitive substring of the entry text
    pub contains_text: Option<String>,

    /// Whole words that must all appear in the entry text
    pub contains_words: Option<Vec<String>>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    /// Shorthand for `min_date(date).max_date(date)`.
    pub fn on(self, date: NaiveDate) -> Self {
        self.min_date(date).max_date(date)
    }

    pub fn min_rating(mut self, rating: i32) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn max_rating(mut self, rating: i32) -> Self {
        self.max_rating = Some(rating);
        self
    }

    pub fn contains_text(mut self, text: impl Into<String>) -> Self {
        self.contains_text = Some(text.into());
        self
    }

    pub fn contains_words<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.contains_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Whether no predicate is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every set predicate, keeping the input order.
    pub fn apply(&self, mut entries: Vec<Entry>) -> Vec<Entry> {
        if let Some(min) = self.min_date {
            entries.retain(|entry| entry.date >= min);
        }

        if let Some(max) = self.max_date {
            // Inclusive of the whole max day.
            entries.retain(|entry| entry.date <= max);
        }

        if let Some(min) = self.min_rating {
            entries.retain(|entry| entry.rating >= min);
        }

        if let Some(max) = self.max_rating {
            entries.retain(|entry| entry.rating <= max);
        }

        if let Some(ref needle) = self.contains_text {
            let needle = needle.to_lowercase();
            entries.retain(|entry| entry.text.to_lowercase().contains(&needle));
        }

        if let Some(ref words) = self.contains_words {
            let words: Vec<String> = words.iter().map(|word| word.to_lowercase()).collect();
            entries.retain(|entry| contains_all_words(&entry.text, &words));
        }

        entries
    }
}

/// Split text into lowercase tokens on newlines, then on spaces.
///
/// Punctuation stays attached to its word and runs of spaces yield empty
/// tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| line.split(' '))
        .map(str::to_lowercase)
        .collect()
}

/// Whole-token membership for every (already lowercased) word.
fn contains_all_words(text: &str, words: &[String]) -> bool {
    let tokens = tokenize(text);
    words.iter().all(|word| tokens.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new(day(2023, 3, 12), 4, "good day"),
            Entry::new(day(2023, 3, 15), 2, "bad day"),
            Entry::new(day(2023, 3, 13), 0, "Walked the dog\nmy dog ran"),
            Entry::new(day(2023, 4, 1), 5, "built a doghouse"),
        ]
    }

    fn dates(entries: &[Entry]) -> Vec<NaiveDate> {
        entries.iter().map(|entry| entry.date).collect()
    }

    #[test]
    fn test_unconstrained_keeps_everything_in_order() {
        let filter = EntryFilter::new();
        assert!(filter.is_unconstrained());
        assert_eq!(filter.apply(sample()), sample());
    }

    #[test]
    fn test_single_day_window() {
        let result = EntryFilter::new().on(day(2023, 3, 13)).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 13)]);
    }

    #[test]
    fn test_min_date_is_inclusive() {
        let result = EntryFilter::new().min_date(day(2023, 3, 13)).apply(sample());
        assert_eq!(
            dates(&result),
            vec![day(2023, 3, 15), day(2023, 3, 13), day(2023, 4, 1)]
        );
    }

    #[test]
    fn test_max_date_includes_whole_day() {
        let result = EntryFilter::new().max_date(day(2023, 3, 13)).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 12), day(2023, 3, 13)]);
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        let result = EntryFilter::new().min_rating(3).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 12), day(2023, 4, 1)]);

        let result = EntryFilter::new().min_rating(2).max_rating(4).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 12), day(2023, 3, 15)]);
    }

    #[test]
    fn test_zero_rating_bound_is_a_real_bound() {
        let result = EntryFilter::new().max_rating(0).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 13)]);

        let mut with_unrated = sample();
        with_unrated.push(Entry::new(day(2023, 5, 1), -1, ""));
        let result = EntryFilter::new().min_rating(0).apply(with_unrated);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_contains_text_is_case_insensitive_substring() {
        let result = EntryFilter::new().contains_text("DOG").apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 13), day(2023, 4, 1)]);
    }

    #[test]
    fn test_contains_words_matches_whole_tokens() {
        let result = EntryFilter::new().contains_words(["dog"]).apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 13)]);
    }

    #[test]
    fn test_contains_words_requires_every_word() {
        let result = EntryFilter::new()
            .contains_words(["Walked", "ran"])
            .apply(sample());
        assert_eq!(result.len(), 1);

        let result = EntryFilter::new()
            .contains_words(["walked", "cat"])
            .apply(sample());
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_word_list_keeps_everything() {
        let words: Vec<String> = Vec::new();
        let result = EntryFilter::new().contains_words(words).apply(sample());
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_tokenize_splits_lines_then_spaces() {
        assert_eq!(
            tokenize("My Dog\nran  far"),
            vec!["my", "dog", "ran", "", "far"]
        );
        assert_eq!(tokenize("dog, cat"), vec!["dog,", "cat"]);
    }

    #[test]
    fn test_predicates_combine() {
        let result = EntryFilter::new()
            .min_date(day(2023, 3, 1))
            .max_date(day(2023, 3, 31))
            .contains_text("day")
            .min_rating(3)
            .apply(sample());
        assert_eq!(dates(&result), vec![day(2023, 3, 12)]);
    }
}
