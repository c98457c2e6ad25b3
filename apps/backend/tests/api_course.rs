//! Course content API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use common::TestContext;

/// The overview lists every section and lesson with its unlock state.
#[tokio::test]
async fn test_course_overview() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/course").await;
    response.assert_status_ok();
    let body: Value = response.json();

    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);

    let lessons = sections[0]["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 3);
    assert_eq!(lessons[0]["id"], "l1");
    assert_eq!(lessons[0]["locked"], false);
    assert_eq!(lessons[0]["stars"], 0);
    assert_eq!(lessons[1]["locked"], true);
    assert_eq!(sections[1]["lessons"][0]["locked"], true);
}

/// Lesson detail carries study content but only an exercise count.
#[tokio::test]
async fn test_lesson_detail() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/lessons/l1").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["title"], "Greetings");
    assert_eq!(body["level"], "A1");
    assert_eq!(body["vocabulary"].as_array().unwrap().len(), 2);
    assert_eq!(body["grammar"]["topic"], "The verb \"to be\"");
    assert_eq!(body["exercise_count"], 2);
    assert!(body.get("exercises").is_none());
}

/// Locked lessons refuse their content.
#[tokio::test]
async fn test_locked_lesson_is_forbidden() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    server
        .get("/api/lessons/l2")
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .get("/api/lessons/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Progress starts at zero with nothing completed.
#[tokio::test]
async fn test_initial_progress_is_empty() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let body: Value = server.get("/api/progress").await.json();
    assert_eq!(body["xp"], 0);
    assert_eq!(body["completed"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
