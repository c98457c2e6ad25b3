//! Learner progress endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use lingua_core::ExperienceStore;

#[derive(Debug, Serialize)]
pub struct CompletedLesson {
    pub id: String,
    pub stars: u8,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub xp: u64,
    pub completed: Vec<CompletedLesson>,
}

/// GET /api/progress
pub async fn summary(State(state): State<AppState>) -> Json<ProgressResponse> {
    let xp = state.store.load_xp();

    let course = state.course.read().expect("course lock");
    let completed = course
        .sections
        .iter()
        .flat_map(|section| section.lessons.iter())
        .filter(|lesson| lesson.completed)
        .map(|lesson| CompletedLesson {
            id: lesson.id.clone(),
            stars: lesson.stars,
        })
        .collect();

    Json(ProgressResponse { xp, completed })
}
