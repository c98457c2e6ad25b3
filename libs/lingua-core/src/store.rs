//! Persistence ports for durable learner state.
//!
//! Two entries are durable: the review map and the experience counter.
//! Both are read and written whole; there are no partial updates and no
//! locking. A single active session per store is a standing assumption:
//! concurrent writers overwrite each other, last writer wins.

use std::sync::Mutex;

use thiserror::Error;

use crate::types::ReviewMap;

/// Failure writing durable learner state.
///
/// Reads never fail: implementations treat absent or malformed data as the
/// empty map or zero counter.
#[derive(Debug, Error)]
#[error("failed to persist {entry}: {detail}")]
pub struct StoreError {
    pub entry: &'static str,
    pub detail: String,
}

impl StoreError {
    pub fn new(entry: &'static str, detail: impl ToString) -> Self {
        Self {
            entry,
            detail: detail.to_string(),
        }
    }
}

/// Port for the persisted review map.
pub trait ReviewStore {
    /// Load the review map, falling back to empty on absent or unreadable data.
    fn load_reviews(&self) -> ReviewMap;

    /// Replace the persisted map with `records`.
    fn save_reviews(&self, records: &ReviewMap) -> Result<(), StoreError>;
}

/// Port for the persisted experience counter.
pub trait ExperienceStore {
    /// Load the counter, falling back to zero on absent or unreadable data.
    fn load_xp(&self) -> u64;

    /// Replace the persisted counter with `xp`.
    fn save_xp(&self, xp: u64) -> Result<(), StoreError>;
}

impl<S: ReviewStore> ReviewStore for &S {
    fn load_reviews(&self) -> ReviewMap {
        (**self).load_reviews()
    }

    fn save_reviews(&self, records: &ReviewMap) -> Result<(), StoreError> {
        (**self).save_reviews(records)
    }
}

impl<S: ExperienceStore> ExperienceStore for &S {
    fn load_xp(&self) -> u64 {
        (**self).load_xp()
    }

    fn save_xp(&self, xp: u64) -> Result<(), StoreError> {
        (**self).save_xp(xp)
    }
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reviews: Mutex<ReviewMap>,
    xp: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewStore for MemoryStore {
    fn load_reviews(&self) -> ReviewMap {
        self.reviews.lock().expect("review store lock").clone()
    }

    fn save_reviews(&self, records: &ReviewMap) -> Result<(), StoreError> {
        *self.reviews.lock().expect("review store lock") = records.clone();
        Ok(())
    }
}

impl ExperienceStore for MemoryStore {
    fn load_xp(&self) -> u64 {
        *self.xp.lock().expect("xp store lock")
    }

    fn save_xp(&self, xp: u64) -> Result<(), StoreError> {
        *self.xp.lock().expect("xp store lock") = xp;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewRecord;
    use chrono::NaiveDate;

    #[test]
    fn memory_store_round_trips_reviews() {
        let store = MemoryStore::new();
        assert!(store.load_reviews().is_empty());

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut records = ReviewMap::new();
        records.insert("dom".to_string(), ReviewRecord::new("dom", today));
        store.save_reviews(&records).unwrap();

        assert_eq!(store.load_reviews(), records);
    }

    #[test]
    fn memory_store_round_trips_xp() {
        let store = MemoryStore::new();
        assert_eq!(store.load_xp(), 0);
        store.save_xp(120).unwrap();
        assert_eq!(store.load_xp(), 120);
    }
}
