//! File-backed learner state: the review map and the experience counter.
//!
//! Each entry is one JSON document read and written whole, mirroring the
//! persistence model of the core's store ports: no partial updates, no
//! locking, last writer wins. A single active session per state directory
//! is a standing assumption, not an enforced invariant.
//!
//! Reads fail open: an absent or malformed file loads as the empty map or
//! zero counter and is logged, never surfaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lingua_core::{ExperienceStore, ReviewMap, ReviewStore, StoreError};

const REVIEWS_FILE: &str = "reviews.json";
const XP_FILE: &str = "xp.json";

/// Whole-document JSON store under a state directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the state directory if missing.
    pub fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_path)
    }

    fn reviews_path(&self) -> PathBuf {
        self.base_path.join(REVIEWS_FILE)
    }

    fn xp_path(&self) -> PathBuf {
        self.base_path.join(XP_FILE)
    }

    fn read_document(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("unreadable state file {}: {}", path.display(), err);
                None
            }
        }
    }
}

impl ReviewStore for JsonStore {
    fn load_reviews(&self) -> ReviewMap {
        let path = self.reviews_path();
        let Some(raw) = Self::read_document(&path) else {
            return ReviewMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!("malformed review state in {}, starting empty: {}", path.display(), err);
            ReviewMap::new()
        })
    }

    fn save_reviews(&self, records: &ReviewMap) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|err| StoreError::new("reviews", err))?;
        fs::write(self.reviews_path(), json).map_err(|err| StoreError::new("reviews", err))
    }
}

impl ExperienceStore for JsonStore {
    fn load_xp(&self) -> u64 {
        let path = self.xp_path();
        let Some(raw) = Self::read_document(&path) else {
            return 0;
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!("malformed experience counter in {}, starting at zero: {}", path.display(), err);
            0
        })
    }

    fn save_xp(&self, xp: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&xp).map_err(|err| StoreError::new("xp", err))?;
        fs::write(self.xp_path(), json).map_err(|err| StoreError::new("xp", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lingua_core::ReviewRecord;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn round_trips_the_review_map() {
        let (_dir, store) = store();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut records = ReviewMap::new();
        records.insert("dom".to_string(), ReviewRecord::new("dom", today));
        store.save_reviews(&records).unwrap();

        assert_eq!(store.load_reviews(), records);
    }

    #[test]
    fn absent_files_load_as_empty_state() {
        let (_dir, store) = store();
        assert!(store.load_reviews().is_empty());
        assert_eq!(store.load_xp(), 0);
    }

    #[test]
    fn malformed_files_load_as_empty_state() {
        let (dir, store) = store();
        fs::write(dir.path().join(REVIEWS_FILE), "not json").unwrap();
        fs::write(dir.path().join(XP_FILE), "{\"nope\": 1}").unwrap();

        assert!(store.load_reviews().is_empty());
        assert_eq!(store.load_xp(), 0);
    }

    #[test]
    fn round_trips_the_experience_counter() {
        let (_dir, store) = store();
        store.save_xp(130).unwrap();
        assert_eq!(store.load_xp(), 130);
    }
}
