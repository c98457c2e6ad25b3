//! Spaced-repetition scheduling for vocabulary review.
//!
//! A simplified SM-2 scheme: the first two successful reviews fix the
//! interval at 1 and 6 days, later ones multiply the previous interval by
//! the easiness factor. An `again` rating sends the word back to the start
//! of the learning ladder without discarding the accumulated easiness.

use chrono::{Duration, NaiveDate};

use crate::store::{ReviewStore, StoreError};
use crate::types::{Rating, ReviewRecord, VocabularyItem};

/// Easiness factor assigned to a newly tracked headword.
pub const INITIAL_EASE: f64 = 2.5;

/// Floor below which the easiness factor never falls.
pub const MINIMUM_EASE: f64 = 1.3;

const FIRST_INTERVAL: u32 = 1;
const SECOND_INTERVAL: u32 = 6;

/// Apply a review rating to a record, yielding the rescheduled record.
///
/// `today` is the review day at calendar-day granularity; the returned
/// record is due `interval_days` after it.
pub fn next_review(record: &ReviewRecord, rating: Rating, today: NaiveDate) -> ReviewRecord {
    let mut interval = record.interval_days;
    let mut repetition = record.repetition;
    let mut ease = record.ease_factor;

    if rating == Rating::Again {
        repetition = 0;
        interval = 0;
    } else {
        ease = match rating {
            Rating::Hard => (ease - 0.2).max(MINIMUM_EASE),
            Rating::Easy => ease + 0.15,
            _ => ease,
        };
        // The growth step uses the pre-update interval with the
        // just-adjusted easiness factor.
        interval = match repetition {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => (interval as f64 * ease).round() as u32,
        };
        repetition += 1;
    }

    ReviewRecord {
        headword: record.headword.clone(),
        interval_days: interval,
        repetition,
        ease_factor: ease,
        due_on: today + Duration::days(interval as i64),
        is_new: false,
    }
}

/// Schedules vocabulary reviews against a persisted review map.
pub struct Scheduler<S> {
    store: S,
}

impl<S: ReviewStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a fresh record for every headword not yet tracked.
    ///
    /// Existing records are never touched. Persists only when at least one
    /// record was inserted; otherwise this is a no-op.
    pub fn ensure_tracked(
        &self,
        vocabulary: &[VocabularyItem],
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut records = self.store.load_reviews();
        let mut changed = false;
        for item in vocabulary {
            if !records.contains_key(&item.headword) {
                records.insert(
                    item.headword.clone(),
                    ReviewRecord::new(&item.headword, today),
                );
                changed = true;
            }
        }
        if changed {
            self.store.save_reviews(&records)?;
        }
        Ok(())
    }

    /// The subsequence of `vocabulary` due on or before `today`, in original
    /// order. A headword without a record counts as due.
    pub fn due_items<'a>(
        &self,
        vocabulary: &'a [VocabularyItem],
        today: NaiveDate,
    ) -> Vec<&'a VocabularyItem> {
        let records = self.store.load_reviews();
        vocabulary
            .iter()
            .filter(|item| {
                records
                    .get(&item.headword)
                    .map_or(true, |record| record.due_on <= today)
            })
            .collect()
    }

    /// Apply a rating to a headword and persist the whole map.
    ///
    /// An untracked headword is created fresh first, so rating a word never
    /// fails on a missing record.
    pub fn review(
        &self,
        headword: &str,
        rating: Rating,
        today: NaiveDate,
    ) -> Result<ReviewRecord, StoreError> {
        let mut records = self.store.load_reviews();
        let current = records
            .get(headword)
            .cloned()
            .unwrap_or_else(|| ReviewRecord::new(headword, today));
        let updated = next_review(&current, rating, today);
        records.insert(headword.to_string(), updated.clone());
        self.store.save_reviews(&records)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn word(headword: &str) -> VocabularyItem {
        VocabularyItem {
            headword: headword.to_string(),
            translation: format!("{headword}-translation"),
            phonetic: String::new(),
            example: String::new(),
            example_translation: String::new(),
        }
    }

    #[test]
    fn again_resets_repetition_and_interval() {
        let mut record = ReviewRecord::new("dom", today());
        record.repetition = 4;
        record.interval_days = 30;
        record.ease_factor = 2.1;

        let updated = next_review(&record, Rating::Again, today());
        assert_eq!(updated.repetition, 0);
        assert_eq!(updated.interval_days, 0);
        // Accumulated easiness survives the lapse.
        assert_eq!(updated.ease_factor, 2.1);
        assert_eq!(updated.due_on, today());
        assert!(!updated.is_new);
    }

    #[test]
    fn learning_ladder_one_six_then_multiplied() {
        let record = ReviewRecord::new("dom", today());

        let first = next_review(&record, Rating::Good, today());
        assert_eq!(first.repetition, 1);
        assert_eq!(first.interval_days, 1);
        assert_eq!(first.ease_factor, 2.5);

        let second = next_review(&first, Rating::Good, today());
        assert_eq!(second.repetition, 2);
        assert_eq!(second.interval_days, 6);

        // Easy bumps the ease first, then the old interval is multiplied:
        // round(6 * 2.65) = 16.
        let third = next_review(&second, Rating::Easy, today());
        assert_eq!(third.repetition, 3);
        assert_eq!(third.ease_factor, 2.65);
        assert_eq!(third.interval_days, 16);
        assert_eq!(third.due_on, today() + Duration::days(16));
    }

    #[test]
    fn hard_never_pushes_ease_below_floor() {
        let mut record = ReviewRecord::new("dom", today());
        record.ease_factor = 1.35;
        record.repetition = 3;
        record.interval_days = 10;

        let updated = next_review(&record, Rating::Hard, today());
        assert_eq!(updated.ease_factor, MINIMUM_EASE);

        let again = next_review(&updated, Rating::Hard, today());
        assert_eq!(again.ease_factor, MINIMUM_EASE);
    }

    #[test]
    fn ensure_tracked_is_idempotent() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::new(&store);
        let vocabulary = vec![word("dom"), word("kot")];

        scheduler.ensure_tracked(&vocabulary, today()).unwrap();
        let first = store.load_reviews();
        assert_eq!(first.len(), 2);

        // Mutate one record through a review, then re-initialize: nothing
        // may be overwritten.
        scheduler.review("dom", Rating::Good, today()).unwrap();
        scheduler.ensure_tracked(&vocabulary, today()).unwrap();
        let after = store.load_reviews();
        assert_eq!(after["dom"].repetition, 1);
        assert_eq!(after["kot"], first["kot"]);
    }

    #[test]
    fn due_items_filters_by_due_date_in_order() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::new(&store);
        let vocabulary = vec![word("dom"), word("kot"), word("pies")];
        scheduler.ensure_tracked(&vocabulary, today()).unwrap();

        // "kot" graduates a day into the future; the others stay due.
        scheduler.review("kot", Rating::Good, today()).unwrap();

        let due = scheduler.due_items(&vocabulary, today());
        let headwords: Vec<_> = due.iter().map(|v| v.headword.as_str()).collect();
        assert_eq!(headwords, vec!["dom", "pies"]);

        // A day later the reviewed word is due again.
        let due = scheduler.due_items(&vocabulary, today() + Duration::days(1));
        assert_eq!(due.len(), 3);
    }

    #[test]
    fn untracked_headword_counts_as_due() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::new(&store);
        let vocabulary = vec![word("dom")];

        let due = scheduler.due_items(&vocabulary, today());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn review_of_untracked_headword_starts_fresh() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::new(&store);

        let updated = scheduler.review("dom", Rating::Good, today()).unwrap();
        assert_eq!(updated.repetition, 1);
        assert_eq!(updated.interval_days, 1);
        assert!(!updated.is_new);
        assert_eq!(store.load_reviews().len(), 1);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let mut record = ReviewRecord::new("dom", today());
        record.repetition = 2;
        record.interval_days = 5;
        record.ease_factor = 1.3;

        // 5 * 1.3 = 6.5 rounds to 7, not 6.
        let updated = next_review(&record, Rating::Good, today());
        assert_eq!(updated.interval_days, 7);
    }
}
