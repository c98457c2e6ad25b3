//! Vocabulary review endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::AppState;
use lingua_core::{Rating, ReviewRecord, Scheduler, VocabularyItem};

#[derive(Debug, Serialize)]
pub struct ReviewQueueResponse {
    pub due: Vec<VocabularyItem>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub headword: String,
    pub rating: Rating,
}

/// GET /api/lessons/{id}/review
///
/// Opens review mode for a lesson: tracks any headwords seen for the first
/// time, then returns the due subsequence of the lesson's vocabulary.
pub async fn queue(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<ReviewQueueResponse>> {
    let vocabulary = {
        let course = state.course.read().expect("course lock");
        let lesson = course
            .find_lesson(&lesson_id)
            .ok_or_else(|| ApiError::NotFound(format!("lesson {}", lesson_id)))?;
        if lesson.locked {
            return Err(ApiError::Locked(format!("lesson {}", lesson_id)));
        }
        lesson.vocabulary.clone()
    };

    let today = Local::now().date_naive();
    let scheduler = Scheduler::new(&*state.store);
    scheduler.ensure_tracked(&vocabulary, today)?;

    let due: Vec<VocabularyItem> = scheduler
        .due_items(&vocabulary, today)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ReviewQueueResponse {
        total: vocabulary.len(),
        due,
    }))
}

/// POST /api/review
pub async fn rate(
    State(state): State<AppState>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<ReviewRecord>> {
    if payload.headword.is_empty() {
        return Err(ApiError::BadRequest("headword must not be empty".to_string()));
    }

    let today = Local::now().date_naive();
    let scheduler = Scheduler::new(&*state.store);
    let record = scheduler.review(&payload.headword, payload.rating, today)?;

    Ok(Json(record))
}
