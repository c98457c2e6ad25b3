//! Core types for the language course: content records and review state.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rating for a vocabulary review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Per-headword review state for the spaced-repetition scheduler.
///
/// Created once per distinct headword and mutated only by review events.
/// The whole map of records is the unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub headword: String,
    pub interval_days: u32,
    pub repetition: u32,
    pub ease_factor: f64,
    pub due_on: NaiveDate,
    pub is_new: bool,
}

impl ReviewRecord {
    /// Fresh record for a headword first seen today: due immediately.
    pub fn new(headword: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            headword: headword.into(),
            interval_days: 0,
            repetition: 0,
            ease_factor: crate::srs::INITIAL_EASE,
            due_on: today,
            is_new: true,
        }
    }
}

/// Persisted review state, keyed by headword.
pub type ReviewMap = HashMap<String, ReviewRecord>;

/// One vocabulary entry of a lesson. Identity key is the exact headword text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub headword: String,
    pub translation: String,
    pub phonetic: String,
    pub example: String,
    pub example_translation: String,
}

/// Practice exercise variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    MultipleChoice,
    TrueFalse,
    ListeningChoice,
    TranslateToTarget,
    TranslateToNative,
    FillBlank,
    ReorderWords,
    MatchPairs,
    Pronunciation,
    Conversation,
}

impl ExerciseKind {
    /// Variants answered by selecting one of the offered options.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::TrueFalse | Self::ListeningChoice
        )
    }

    /// Variants answered with typed free text.
    pub fn is_free_text(self) -> bool {
        matches!(
            self,
            Self::TranslateToTarget | Self::TranslateToNative | Self::FillBlank
        )
    }
}

/// Expected answer for an exercise.
///
/// The JSON shape follows the variant: a single string, a list of acceptable
/// strings, or a left-to-right pair mapping for match-pairs boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Single(String),
    AnyOf(Vec<String>),
    Pairs(BTreeMap<String, String>),
}

impl AnswerKey {
    /// The pair mapping, for match-pairs exercises.
    pub fn pairs(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Pairs(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// A representative acceptable answer, used for feedback display.
    pub fn display(&self) -> Option<&str> {
        match self {
            Self::Single(answer) => Some(answer),
            Self::AnyOf(answers) => answers.first().map(String::as_str),
            Self::Pairs(_) => None,
        }
    }
}

/// One practice exercise of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub kind: ExerciseKind,
    pub prompt: String,
    /// Text to synthesize for listening and pronunciation prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_text: Option<String>,
    /// Choice options, word bank, or flattened pair tokens.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Absent for conversation exercises, which are not graded locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Exercise {
    /// The utterance to hand to the text-to-speech capability for this
    /// exercise's audio prompt, if it has one.
    pub fn utterance(&self, locale: &str) -> Option<crate::speech::Utterance> {
        self.audio_text
            .as_ref()
            .map(|text| crate::speech::Utterance::new(text, locale))
    }
}

/// CEFR level tag of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    A0,
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// A short expression taught alongside vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarRule {
    pub rule: String,
    pub example: String,
}

/// The grammar topic of a lesson with its rules and examples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarTopic {
    pub topic: String,
    pub explanation: String,
    #[serde(default)]
    pub rules: Vec<GrammarRule>,
}

/// One line of a study dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLine {
    pub speaker: String,
    pub text: String,
    pub translation: String,
}

/// A lesson: study content plus its practice exercises and unlock state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub level: Level,
    pub title: String,
    pub description: String,
    pub locked: bool,
    pub completed: bool,
    /// 0 until first completion, then 1 or 3; never decreases.
    pub stars: u8,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
    #[serde(default)]
    pub grammar: GrammarTopic,
    #[serde(default)]
    pub dialogs: Vec<Vec<DialogLine>>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// An ordered group of lessons sharing a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    pub lessons: Vec<Lesson>,
}
