//! Practice session endpoints
//!
//! Sessions live in server memory keyed by a generated id. All transient
//! exercise state stays inside the core session; completion is the only
//! point where the course graph and the experience counter are touched.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::{AppState, SessionEntry};
use lingua_core::{
    Advanced, AnswerKey, ChatTurn, ExerciseKind, ExperienceStore, PracticeSession, TutorTurn,
};

/// What the learner sees of the current exercise: prompt and display
/// material, never the answer key.
#[derive(Debug, Serialize)]
pub struct ExerciseView {
    pub id: String,
    pub kind: ExerciseKind,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub word_bank: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub left_tokens: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub right_tokens: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseView>,
    pub total: usize,
    pub progress: f32,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Typed answer or pronunciation transcript.
    #[serde(default)]
    pub text: Option<String>,
    /// Selected option for choice variants.
    #[serde(default)]
    pub choice: Option<String>,
    /// Constructed word order for reorder exercises.
    #[serde(default)]
    pub words: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub correct: bool,
    pub score: u32,
    /// A representative accepted answer, echoed on incorrect attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PairClickRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct PairBoardResponse {
    pub left_tokens: Vec<String>,
    pub right_tokens: Vec<String>,
    pub solved_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    pub solved_count: usize,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub reply: TutorTurn,
    pub turns: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub complete: bool,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionView>,
    /// Total persisted experience after completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_total: Option<u64>,
}

fn exercise_view(session: &PracticeSession) -> Option<ExerciseView> {
    let exercise = session.current()?;
    let slot = session.slot();
    let options = if exercise.kind.is_choice() {
        exercise.options.clone()
    } else {
        Vec::new()
    };
    Some(ExerciseView {
        id: exercise.id.clone(),
        kind: exercise.kind,
        prompt: exercise.prompt.clone(),
        audio_text: exercise.audio_text.clone(),
        options,
        word_bank: slot.word_bank.clone(),
        left_tokens: slot.left_tokens.clone(),
        right_tokens: slot.right_tokens.clone(),
    })
}

fn session_view(session_id: Uuid, session: &PracticeSession) -> SessionView {
    SessionView {
        session_id,
        exercise: exercise_view(session),
        total: session.total(),
        progress: session.progress(),
        score: session.score(),
    }
}

/// POST /api/lessons/{id}/practice
pub async fn start(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<SessionView>> {
    let (exercises, lesson_title) = {
        let course = state.course.read().expect("course lock");
        let lesson = course
            .find_lesson(&lesson_id)
            .ok_or_else(|| ApiError::NotFound(format!("lesson {}", lesson_id)))?;
        if lesson.locked {
            return Err(ApiError::Locked(format!("lesson {}", lesson_id)));
        }
        (lesson.exercises.clone(), lesson.title.clone())
    };

    let session = PracticeSession::new(exercises, &mut rand::thread_rng());
    let session_id = Uuid::new_v4();
    let view = session_view(session_id, &session);

    state.sessions.lock().expect("sessions lock").insert(
        session_id,
        SessionEntry {
            lesson_id,
            lesson_title,
            session,
        },
    );

    Ok(Json(view))
}

/// GET /api/practice/{sid}
pub async fn current(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let sessions = state.sessions.lock().expect("sessions lock");
    let entry = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
    Ok(Json(session_view(session_id, &entry.session)))
}

/// POST /api/practice/{sid}/answer
///
/// Applies the submitted material to the session's transient state, then
/// checks the current exercise.
pub async fn answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<CheckResponse>> {
    let mut sessions = state.sessions.lock().expect("sessions lock");
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
    let session = &mut entry.session;

    if let Some(text) = payload.text {
        session.set_input(text);
    }
    if let Some(choice) = payload.choice {
        session.select_option(choice);
    }
    if let Some(words) = payload.words {
        // Replay the submitted order against the word bank; words not in
        // the bank are dropped and the attempt grades incorrect.
        session.clear_words();
        for word in &words {
            if let Some(index) = session.slot().word_bank.iter().position(|w| w == word) {
                session.pick_word(index);
            }
        }
    }

    let correct = session.check()?;
    let exercise = session.current();
    let expected = if correct {
        None
    } else {
        exercise
            .and_then(|exercise| exercise.answer.as_ref())
            .and_then(|answer| answer.display())
            .map(String::from)
    };
    let explanation = exercise.and_then(|exercise| exercise.explanation.clone());

    Ok(Json(CheckResponse {
        correct,
        score: session.score(),
        expected,
        explanation,
    }))
}

/// POST /api/practice/{sid}/pairs
pub async fn pair_click(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<PairClickRequest>,
) -> Result<Json<PairBoardResponse>> {
    let mut sessions = state.sessions.lock().expect("sessions lock");
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
    let session = &mut entry.session;

    match session.current().map(|exercise| exercise.kind) {
        Some(ExerciseKind::MatchPairs) => {}
        Some(_) => {
            return Err(ApiError::BadRequest(
                "the current exercise is not match-pairs".to_string(),
            ))
        }
        None => return Err(ApiError::NotFound(format!("session {}", session_id))),
    }

    session.click_pair_token(&payload.token);

    let slot = session.slot();
    let total = session
        .current()
        .and_then(|exercise| exercise.answer.as_ref())
        .and_then(AnswerKey::pairs)
        .map_or(0, |pairs| pairs.len());

    Ok(Json(PairBoardResponse {
        left_tokens: slot.left_tokens.clone(),
        right_tokens: slot.right_tokens.clone(),
        solved_keys: slot.pairs.solved_keys().map(String::from).collect(),
        selection: slot.pairs.selection().map(String::from),
        solved_count: slot.pairs.solved_count(),
        total,
    }))
}

/// POST /api/practice/{sid}/conversation
///
/// A single tutor call may be outstanding per session; further submissions
/// are refused until it resolves. The call itself runs without holding the
/// session map.
pub async fn conversation(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<ConversationRequest>,
) -> Result<Json<ConversationResponse>> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let (history, lesson_title) = {
        let mut sessions = state.sessions.lock().expect("sessions lock");
        let entry = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
        entry.session.begin_conversation_turn(payload.message.clone())?;
        let turns = entry.session.conversation().turns();
        (
            turns[..turns.len() - 1].to_vec(),
            entry.lesson_title.clone(),
        )
    };

    let reply = state
        .tutor
        .converse(&history, &payload.message, &lesson_title)
        .await;

    let mut sessions = state.sessions.lock().expect("sessions lock");
    let turns = match sessions.get_mut(&session_id) {
        Some(entry) => {
            entry.session.resolve_conversation_turn(reply.clone());
            entry.session.conversation().turns().to_vec()
        }
        // The session ended while the call was in flight; the turn is
        // reported but no longer recorded anywhere.
        None => Vec::new(),
    };

    Ok(Json(ConversationResponse { reply, turns }))
}

/// POST /api/practice/{sid}/advance
///
/// Moves to the next exercise. On the final advance the session's score is
/// applied to the course graph and the persisted experience counter, and
/// the session is dropped.
pub async fn advance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>> {
    let mut sessions = state.sessions.lock().expect("sessions lock");
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;

    match entry.session.advance(&mut rand::thread_rng())? {
        Advanced::Next => {
            let view = session_view(session_id, &entry.session);
            Ok(Json(AdvanceResponse {
                complete: false,
                score: entry.session.score(),
                session: Some(view),
                xp_total: None,
            }))
        }
        Advanced::Complete { score } => {
            let lesson_id = entry.lesson_id.clone();
            sessions.remove(&session_id);
            drop(sessions);

            state
                .course
                .write()
                .expect("course lock")
                .apply_completion(&lesson_id, score);

            let xp_total = state.store.load_xp() + u64::from(score);
            state.store.save_xp(xp_total)?;

            tracing::info!(lesson = %lesson_id, score, "practice session complete");

            Ok(Json(AdvanceResponse {
                complete: true,
                score,
                session: None,
                xp_total: Some(xp_total),
            }))
        }
    }
}
