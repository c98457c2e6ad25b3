//! Practice-session state machine: one run through a lesson's exercises.
//!
//! Each exercise slot moves `Unanswered -> Checked -> advance`; the session
//! completes after the last slot and yields the accumulated score. All side
//! effects stay in transient session state; nothing is persisted until the
//! caller applies the final score.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::conversation::{Conversation, TutorTurn};
use crate::grading::{grade, Submission};
use crate::pairs::PairProgress;
use crate::types::{AnswerKey, Exercise, ExerciseKind};

/// Points awarded per correctly answered exercise.
pub const POINTS_PER_EXERCISE: u32 = 10;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("the session is already complete")]
    Finished,
    #[error("the current exercise was already checked")]
    AlreadyChecked,
    #[error("the current exercise has not been checked yet")]
    NotChecked,
    #[error("conversation exercises are not graded locally")]
    NotGradable,
    #[error("the current exercise is not a conversation")]
    NotConversation,
    #[error("a tutor reply is already outstanding")]
    TutorBusy,
}

/// Transient state of the exercise currently on screen.
///
/// Reset wholesale when the session advances; display orders are shuffled
/// with the session's random source and never affect grading.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    /// Typed answer or recognized transcript.
    pub input: String,
    pub selected_option: Option<String>,
    /// Remaining word-bank tokens for reorder exercises.
    pub word_bank: Vec<String>,
    /// Words placed so far, in learner order.
    pub constructed: Vec<String>,
    /// Shuffled display columns for match-pairs.
    pub left_tokens: Vec<String>,
    pub right_tokens: Vec<String>,
    pub pairs: PairProgress,
    pub conversation: Conversation,
    /// `None` until checked, then the grading outcome.
    pub outcome: Option<bool>,
}

impl SlotState {
    fn for_exercise(exercise: &Exercise, rng: &mut impl Rng) -> Self {
        let mut slot = Self::default();
        match exercise.kind {
            ExerciseKind::ReorderWords => {
                slot.word_bank = exercise.options.clone();
                slot.word_bank.shuffle(rng);
            }
            ExerciseKind::MatchPairs => {
                if let Some(AnswerKey::Pairs(pairs)) = exercise.answer.as_ref() {
                    slot.left_tokens = pairs.keys().cloned().collect();
                    slot.right_tokens = pairs.values().cloned().collect();
                    slot.left_tokens.shuffle(rng);
                    slot.right_tokens.shuffle(rng);
                }
            }
            _ => {}
        }
        slot
    }
}

/// Outcome of advancing past the current exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    Next,
    Complete { score: u32 },
}

/// One run through an ordered exercise list, accumulating score.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    exercises: Vec<Exercise>,
    current: usize,
    score: u32,
    slot: SlotState,
    complete: bool,
}

impl PracticeSession {
    pub fn new(exercises: Vec<Exercise>, rng: &mut impl Rng) -> Self {
        let slot = exercises
            .first()
            .map(|exercise| SlotState::for_exercise(exercise, rng))
            .unwrap_or_default();
        Self {
            exercises,
            current: 0,
            score: 0,
            slot,
            complete: false,
        }
    }

    /// The exercise awaiting an answer, if the session is still running.
    pub fn current(&self) -> Option<&Exercise> {
        if self.complete {
            None
        } else {
            self.exercises.get(self.current)
        }
    }

    pub fn slot(&self) -> &SlotState {
        &self.slot
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Completed fraction, reported before advancing past the current slot.
    pub fn progress(&self) -> f32 {
        if self.exercises.is_empty() {
            0.0
        } else {
            self.current as f32 / self.exercises.len() as f32
        }
    }

    fn interactive(&self) -> bool {
        !self.complete && self.slot.outcome.is_none()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.interactive() {
            self.slot.input = text.into();
        }
    }

    pub fn select_option(&mut self, option: impl Into<String>) {
        if self.interactive() {
            self.slot.selected_option = Some(option.into());
        }
    }

    /// Move a word from the bank into the constructed sentence.
    pub fn pick_word(&mut self, index: usize) {
        if self.interactive() && index < self.slot.word_bank.len() {
            let word = self.slot.word_bank.remove(index);
            self.slot.constructed.push(word);
        }
    }

    /// Return a constructed word to the bank.
    pub fn unpick_word(&mut self, index: usize) {
        if self.interactive() && index < self.slot.constructed.len() {
            let word = self.slot.constructed.remove(index);
            self.slot.word_bank.push(word);
        }
    }

    /// Return every constructed word to the bank.
    pub fn clear_words(&mut self) {
        if self.interactive() {
            let words = std::mem::take(&mut self.slot.constructed);
            self.slot.word_bank.extend(words);
        }
    }

    /// Forward a click on a match-pairs token to the pair sub-machine.
    pub fn click_pair_token(&mut self, token: &str) {
        if !self.interactive() {
            return;
        }
        if let Some(AnswerKey::Pairs(pairs)) = self
            .exercises
            .get(self.current)
            .and_then(|exercise| exercise.answer.as_ref())
        {
            self.slot.pairs.click(token, pairs);
        }
    }

    /// Append a recognized transcript to the input buffer.
    pub fn apply_transcript(&mut self, transcript: &str) {
        if !self.interactive() {
            return;
        }
        if self.slot.input.is_empty() {
            self.slot.input = transcript.to_string();
        } else {
            self.slot.input.push(' ');
            self.slot.input.push_str(transcript);
        }
    }

    /// Grade the current exercise from its transient state.
    ///
    /// Awards the fixed per-exercise reward on a correct answer and locks
    /// the slot until `advance`.
    pub fn check(&mut self) -> Result<bool, SessionError> {
        if self.complete {
            return Err(SessionError::Finished);
        }
        let Some(exercise) = self.exercises.get(self.current) else {
            return Err(SessionError::Finished);
        };
        if self.slot.outcome.is_some() {
            return Err(SessionError::AlreadyChecked);
        }

        let submission = match exercise.kind {
            ExerciseKind::Conversation => return Err(SessionError::NotGradable),
            ExerciseKind::ReorderWords => Submission::WordOrder(self.slot.constructed.clone()),
            ExerciseKind::Pronunciation => Submission::Transcript(self.slot.input.clone()),
            ExerciseKind::MatchPairs => Submission::PairsSolved(self.slot.pairs.solved_count()),
            kind if kind.is_choice() => {
                Submission::Choice(self.slot.selected_option.clone().unwrap_or_default())
            }
            _ => Submission::Text(self.slot.input.clone()),
        };

        let correct = grade(exercise, &submission);
        if correct {
            self.score += POINTS_PER_EXERCISE;
        }
        self.slot.outcome = Some(correct);
        Ok(correct)
    }

    /// Move to the next exercise, or complete the session.
    ///
    /// Requires the current exercise to be checked first. Conversation
    /// exercises are the exception: the learner may advance past them at
    /// any time.
    pub fn advance(&mut self, rng: &mut impl Rng) -> Result<Advanced, SessionError> {
        if self.complete {
            return Err(SessionError::Finished);
        }
        match self.exercises.get(self.current) {
            Some(exercise) => {
                if exercise.kind != ExerciseKind::Conversation && self.slot.outcome.is_none() {
                    return Err(SessionError::NotChecked);
                }
            }
            // A lesson with no exercises completes on the first advance.
            None => {
                self.complete = true;
                return Ok(Advanced::Complete { score: self.score });
            }
        }

        self.current += 1;
        match self.exercises.get(self.current) {
            Some(next) => {
                self.slot = SlotState::for_exercise(next, rng);
                Ok(Advanced::Next)
            }
            None => {
                self.complete = true;
                self.slot = SlotState::default();
                Ok(Advanced::Complete { score: self.score })
            }
        }
    }

    /// Record the learner's utterance for the current conversation exercise.
    pub fn begin_conversation_turn(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        match self.current() {
            None => return Err(SessionError::Finished),
            Some(exercise) if exercise.kind != ExerciseKind::Conversation => {
                return Err(SessionError::NotConversation)
            }
            Some(_) => {}
        }
        self.slot
            .conversation
            .begin_turn(text)
            .map_err(|_| SessionError::TutorBusy)
    }

    /// Deliver the tutor's reply (or classified failure) for the pending turn.
    pub fn resolve_conversation_turn(&mut self, turn: TutorTurn) {
        self.slot.conversation.resolve(turn);
    }

    pub fn conversation(&self) -> &Conversation {
        &self.slot.conversation
    }
}
