//! Core library for the lingua self-study language course.
//!
//! Provides:
//! - Simplified SM-2 spaced-repetition scheduling for vocabulary review
//! - Answer grading for every practice exercise variant
//! - The practice-session state machine with scoring
//! - Course completion, stars, and content unlocking
//! - Persistence ports and contract types for the external tutor and
//!   speech capabilities

pub mod conversation;
pub mod grading;
pub mod pairs;
pub mod progress;
pub mod session;
pub mod speech;
pub mod srs;
pub mod store;
pub mod types;

pub use conversation::{
    classify, ChatTurn, Conversation, ConversationError, Speaker, TutorFailure, TutorTurn,
};
pub use grading::{grade, normalize, Submission};
pub use pairs::PairProgress;
pub use progress::{Course, THREE_STAR_SCORE};
pub use session::{Advanced, PracticeSession, SessionError, SlotState, POINTS_PER_EXERCISE};
pub use speech::{Capture, CaptureError, CaptureEvent, Utterance};
pub use srs::{next_review, Scheduler, INITIAL_EASE, MINIMUM_EASE};
pub use store::{ExperienceStore, MemoryStore, ReviewStore, StoreError};
pub use types::{
    AnswerKey, DialogLine, Exercise, ExerciseKind, GrammarRule, GrammarTopic, Lesson, Level,
    Phrase, Rating, ReviewMap, ReviewRecord, Section, VocabularyItem,
};
