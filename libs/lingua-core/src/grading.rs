//! Stateless answer grading, one branch per exercise variant.
//!
//! Grading never rejects malformed input: a submission whose shape does not
//! fit the exercise simply evaluates to incorrect. Conversation exercises
//! are graded by the external tutor, never here.

use serde::{Deserialize, Serialize};

use crate::types::{AnswerKey, Exercise, ExerciseKind};

/// Punctuation stripped during free-text normalization.
const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Punctuation tolerated when comparing reordered sentences.
const SENTENCE_PUNCTUATION: &[char] = &['.', ',', '?', '!'];

/// Lower-case, strip the fixed punctuation set, trim.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();
    stripped.trim().to_string()
}

fn strip_sentence_punctuation(sentence: &str) -> String {
    sentence
        .chars()
        .filter(|c| !SENTENCE_PUNCTUATION.contains(c))
        .collect()
}

/// A learner's answer, in the shape its exercise variant expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    /// Selected option text (choice variants).
    Choice(String),
    /// Typed answer (translation, fill-blank).
    Text(String),
    /// Learner-ordered words (reorder-words).
    WordOrder(Vec<String>),
    /// Recognized or typed transcript (pronunciation).
    Transcript(String),
    /// Count of solved pairs (match-pairs).
    PairsSolved(usize),
}

/// Grade a submission against an exercise.
pub fn grade(exercise: &Exercise, submission: &Submission) -> bool {
    let Some(answer) = exercise.answer.as_ref() else {
        return false;
    };

    match (exercise.kind, submission) {
        (kind, Submission::Choice(picked)) if kind.is_choice() => match answer {
            AnswerKey::Single(expected) => picked == expected,
            _ => false,
        },
        (kind, Submission::Text(typed)) if kind.is_free_text() => {
            let cleaned = normalize(typed);
            match answer {
                AnswerKey::Single(expected) => normalize(expected) == cleaned,
                AnswerKey::AnyOf(accepted) => accepted.iter().any(|a| normalize(a) == cleaned),
                AnswerKey::Pairs(_) => false,
            }
        }
        (ExerciseKind::ReorderWords, Submission::WordOrder(words)) => {
            let AnswerKey::Single(target) = answer else {
                return false;
            };
            let sentence = words.join(" ");
            sentence.trim() == target.trim()
                || strip_sentence_punctuation(&sentence) == strip_sentence_punctuation(target)
        }
        (ExerciseKind::Pronunciation, Submission::Transcript(transcript)) => {
            let AnswerKey::Single(target) = answer else {
                return false;
            };
            let spoken = normalize(transcript);
            let target = normalize(target);
            if spoken.contains(&target) || target.contains(&spoken) {
                return true;
            }
            // Loose length heuristic, a deliberate proxy for spoken accuracy.
            let spoken_len = spoken.chars().count();
            let target_len = target.chars().count();
            spoken_len > 3 && spoken_len.abs_diff(target_len) < 5
        }
        (ExerciseKind::MatchPairs, Submission::PairsSolved(solved)) => {
            let AnswerKey::Pairs(pairs) = answer else {
                return false;
            };
            *solved == pairs.len()
        }
        _ => false,
    }
}
