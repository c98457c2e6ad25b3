//! Course content endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::AppState;
use lingua_core::{DialogLine, GrammarTopic, Level, Phrase, VocabularyItem};

#[derive(Debug, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub level: Level,
    pub locked: bool,
    pub completed: bool,
    pub stars: u8,
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub lessons: Vec<LessonSummary>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub sections: Vec<SectionSummary>,
}

/// Full study content of an unlocked lesson. Exercises are reachable only
/// through a practice session, so only their count is reported here.
#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: Level,
    pub completed: bool,
    pub stars: u8,
    pub vocabulary: Vec<VocabularyItem>,
    pub phrases: Vec<Phrase>,
    pub grammar: GrammarTopic,
    pub dialogs: Vec<Vec<DialogLine>>,
    pub exercise_count: usize,
}

/// GET /api/course
pub async fn overview(State(state): State<AppState>) -> Json<CourseResponse> {
    let course = state.course.read().expect("course lock");

    let sections = course
        .sections
        .iter()
        .map(|section| SectionSummary {
            id: section.id.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            lessons: section
                .lessons
                .iter()
                .map(|lesson| LessonSummary {
                    id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    level: lesson.level,
                    locked: lesson.locked,
                    completed: lesson.completed,
                    stars: lesson.stars,
                })
                .collect(),
        })
        .collect();

    Json(CourseResponse { sections })
}

/// GET /api/lessons/{id}
pub async fn lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<LessonResponse>> {
    let course = state.course.read().expect("course lock");

    let lesson = course
        .find_lesson(&lesson_id)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {}", lesson_id)))?;
    if lesson.locked {
        return Err(ApiError::Locked(format!("lesson {}", lesson_id)));
    }

    Ok(Json(LessonResponse {
        id: lesson.id.clone(),
        title: lesson.title.clone(),
        description: lesson.description.clone(),
        level: lesson.level,
        completed: lesson.completed,
        stars: lesson.stars,
        vocabulary: lesson.vocabulary.clone(),
        phrases: lesson.phrases.clone(),
        grammar: lesson.grammar.clone(),
        dialogs: lesson.dialogs.clone(),
        exercise_count: lesson.exercises.len(),
    }))
}
