//! Selection sub-machine for the match-pairs exercise.

use std::collections::{BTreeMap, BTreeSet};

/// A learner's progress through a match-pairs board.
///
/// At most one pick is pending at a time. Matching a pending pick against
/// its counterpart (in either column order) solves the pair; solved tokens
/// stay permanently inactive. A mismatch carries no penalty, it only moves
/// the pending selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairProgress {
    selected: Option<String>,
    solved: BTreeSet<String>,
}

impl PairProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a displayed token from either column.
    ///
    /// `pairs` is the exercise's left-to-right mapping; clicks on tokens of
    /// already-solved pairs are ignored.
    pub fn click(&mut self, token: &str, pairs: &BTreeMap<String, String>) {
        if self.is_solved(token, pairs) {
            return;
        }

        let Some(pending) = self.selected.take() else {
            self.selected = Some(token.to_string());
            return;
        };

        let matched_key = if pairs.get(&pending).is_some_and(|value| value == token) {
            Some(pending.clone())
        } else if pairs.get(token).is_some_and(|value| *value == pending) {
            Some(token.to_string())
        } else {
            None
        };

        match matched_key {
            Some(key) => {
                self.solved.insert(key);
            }
            // Clicking the pending token again deselects it.
            None if pending == token => {}
            None => self.selected = Some(token.to_string()),
        }
    }

    /// Whether `token` belongs to an already-solved pair.
    pub fn is_solved(&self, token: &str, pairs: &BTreeMap<String, String>) -> bool {
        self.solved.contains(token)
            || self
                .solved
                .iter()
                .any(|key| pairs.get(key).is_some_and(|value| value == token))
    }

    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    pub fn solved_keys(&self) -> impl Iterator<Item = &str> {
        self.solved.iter().map(String::as_str)
    }

    pub fn is_complete(&self, pairs: &BTreeMap<String, String>) -> bool {
        self.solved.len() == pairs.len()
    }
}
