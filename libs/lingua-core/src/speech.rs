//! Speech capability boundary.
//!
//! Text-to-speech and speech-to-text are platform capabilities the core
//! consumes but does not implement: the core hands out utterances to
//! synthesize and applies recognizer completion events.

use serde::{Deserialize, Serialize};

/// A text-to-speech request for the platform synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: locale.into(),
        }
    }
}

/// Error codes reported by the speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureError {
    /// Microphone access denied.
    NotAllowed,
    /// Nothing intelligible was heard.
    NoSpeech,
    /// No recognizer available on this platform.
    Unsupported,
    Other(String),
}

/// Completion event from the external recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Transcript(String),
    Failed(CaptureError),
}

/// One speech-capture activation.
///
/// The recognizer delivers at most one final transcript per activation.
/// Toggling while active cancels the capture and discards whatever partial
/// result might still arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capture {
    active: bool,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggle the recognizer; returns the new active state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Deliver the recognizer's completion event.
    ///
    /// Returns the transcript only when a capture was actually active;
    /// a result arriving after a cancel is dropped.
    pub fn finish(&mut self, event: CaptureEvent) -> Option<String> {
        let was_active = std::mem::replace(&mut self.active, false);
        match event {
            CaptureEvent::Transcript(text) if was_active => Some(text),
            _ => None,
        }
    }
}
