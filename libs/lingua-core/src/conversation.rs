//! Conversational-practice boundary: the tutor contract and the turn log.
//!
//! Language generation is delegated to an external AI service. The core only
//! defines the wire contract (`TutorTurn`), a classification of call
//! failures into fixed user-facing messages, and the single-slot in-flight
//! state machine for a conversation exercise. Failures are terminal for the
//! turn; the core never retries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Learner,
    Tutor,
}

/// One displayed turn of a conversation exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub is_error: bool,
}

/// The tutor's reply to one learner utterance.
///
/// A classified failure is delivered through the same shape with
/// `is_error` set, so the conversation renders it inline instead of
/// aborting the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorTurn {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    pub is_error: bool,
}

impl TutorTurn {
    pub fn reply(text: impl Into<String>, correction: Option<String>) -> Self {
        Self {
            text: text.into(),
            correction,
            is_error: false,
        }
    }

    pub fn failure(failure: TutorFailure) -> Self {
        Self {
            text: failure.user_message().to_string(),
            correction: None,
            is_error: true,
        }
    }
}

/// Failure classes for a tutor call; one fixed user-facing message each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorFailure {
    QuotaExceeded,
    Unauthorized,
    Unavailable,
    Network,
    SafetyBlocked,
    Misconfigured,
    Other,
}

impl TutorFailure {
    /// The fixed message shown to the learner for this class.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::QuotaExceeded => "Request quota exhausted. Try again later.",
            Self::Unauthorized => "Authorization failed. Check the API key.",
            Self::Unavailable => {
                "The tutor service is temporarily unavailable or overloaded. Try again in a moment."
            }
            Self::Network => "Network error. Check your internet connection.",
            Self::SafetyBlocked => "The reply was blocked by safety filters.",
            Self::Misconfigured => "Configuration error: no tutor API key is set.",
            Self::Other => "An unexpected error occurred while contacting the tutor.",
        }
    }
}

/// Classify a failed tutor call from its HTTP status and detail text.
pub fn classify(status: Option<u16>, detail: &str) -> TutorFailure {
    let detail = detail.to_lowercase();
    match status {
        Some(429) => return TutorFailure::QuotaExceeded,
        Some(401) | Some(403) => return TutorFailure::Unauthorized,
        Some(500) | Some(503) => return TutorFailure::Unavailable,
        _ => {}
    }
    if detail.contains("quota") || detail.contains("resource exhausted") {
        TutorFailure::QuotaExceeded
    } else if detail.contains("key") || detail.contains("permission") {
        TutorFailure::Unauthorized
    } else if detail.contains("overloaded") || detail.contains("internal") {
        TutorFailure::Unavailable
    } else if detail.contains("network") || detail.contains("connect") || detail.contains("timed out")
    {
        TutorFailure::Network
    } else if detail.contains("blocked") || detail.contains("safety") {
        TutorFailure::SafetyBlocked
    } else {
        TutorFailure::Other
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConversationError {
    #[error("a tutor reply is already outstanding")]
    Busy,
}

/// Turn log for a conversation exercise.
///
/// A single tutor call may be outstanding at a time: submitting is refused
/// until the pending call resolves (successfully or with a classified
/// failure). There is no cancellation of an in-flight call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    awaiting_reply: bool,
    last_correction: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the learner's utterance and occupy the in-flight slot.
    pub fn begin_turn(&mut self, text: impl Into<String>) -> Result<(), ConversationError> {
        if self.awaiting_reply {
            return Err(ConversationError::Busy);
        }
        self.turns.push(ChatTurn {
            speaker: Speaker::Learner,
            text: text.into(),
            is_error: false,
        });
        self.awaiting_reply = true;
        self.last_correction = None;
        Ok(())
    }

    /// Append the tutor's reply (error turns included) and free the slot.
    pub fn resolve(&mut self, turn: TutorTurn) {
        self.turns.push(ChatTurn {
            speaker: Speaker::Tutor,
            text: turn.text,
            is_error: turn.is_error,
        });
        self.last_correction = turn.correction;
        self.awaiting_reply = false;
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The correction attached to the most recent tutor reply, if any.
    pub fn last_correction(&self) -> Option<&str> {
        self.last_correction.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_outstanding_call_at_a_time() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("Hello").unwrap();
        assert!(conversation.awaiting_reply());
        assert_eq!(
            conversation.begin_turn("Hello again"),
            Err(ConversationError::Busy)
        );

        conversation.resolve(TutorTurn::reply("Hi! How are you?", None));
        assert!(!conversation.awaiting_reply());
        conversation.begin_turn("I am fine").unwrap();
    }

    #[test]
    fn failure_resolves_as_inline_error_turn() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("Hello").unwrap();
        conversation.resolve(TutorTurn::failure(TutorFailure::Unavailable));

        let turns = conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].speaker, Speaker::Tutor);
        assert!(turns[1].is_error);
        assert!(!conversation.awaiting_reply());
    }

    #[test]
    fn correction_is_kept_until_the_next_turn() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("I has a dog").unwrap();
        conversation.resolve(TutorTurn::reply(
            "Nice! What is its name?",
            Some("Say \"I have a dog\".".to_string()),
        ));
        assert_eq!(
            conversation.last_correction(),
            Some("Say \"I have a dog\".")
        );

        conversation.begin_turn("Rex").unwrap();
        assert_eq!(conversation.last_correction(), None);
    }

    #[test]
    fn classify_maps_statuses_and_details() {
        assert_eq!(classify(Some(429), ""), TutorFailure::QuotaExceeded);
        assert_eq!(classify(Some(401), ""), TutorFailure::Unauthorized);
        assert_eq!(classify(Some(403), ""), TutorFailure::Unauthorized);
        assert_eq!(classify(Some(500), ""), TutorFailure::Unavailable);
        assert_eq!(classify(Some(503), ""), TutorFailure::Unavailable);
        assert_eq!(
            classify(None, "connection refused: could not connect"),
            TutorFailure::Network
        );
        assert_eq!(
            classify(None, "response blocked by safety system"),
            TutorFailure::SafetyBlocked
        );
        assert_eq!(classify(None, "something odd"), TutorFailure::Other);
    }
}
