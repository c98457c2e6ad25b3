pub mod content;
pub mod error;
pub mod routes;
pub mod services;
pub mod store;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use lingua_core::{Course, PracticeSession};

use crate::services::tutor::TutorClient;
use crate::store::JsonStore;

/// A practice session held in server memory, keyed by its public id.
pub struct SessionEntry {
    pub lesson_id: String,
    pub lesson_title: String,
    pub session: PracticeSession,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub course: Arc<RwLock<Course>>,
    pub sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    pub store: Arc<JsonStore>,
    pub tutor: Arc<TutorClient>,
}

impl AppState {
    pub fn new(course: Course, store: JsonStore, tutor: TutorClient) -> Self {
        Self {
            course: Arc::new(RwLock::new(course)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            store: Arc::new(store),
            tutor: Arc::new(tutor),
        }
    }
}

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Course content
        .route("/api/course", get(routes::course::overview))
        .route("/api/lessons/{id}", get(routes::course::lesson))
        // Vocabulary review
        .route("/api/lessons/{id}/review", get(routes::review::queue))
        .route("/api/review", post(routes::review::rate))
        // Practice sessions
        .route("/api/lessons/{id}/practice", post(routes::practice::start))
        .route("/api/practice/{sid}", get(routes::practice::current))
        .route("/api/practice/{sid}/answer", post(routes::practice::answer))
        .route("/api/practice/{sid}/pairs", post(routes::practice::pair_click))
        .route(
            "/api/practice/{sid}/conversation",
            post(routes::practice::conversation),
        )
        .route("/api/practice/{sid}/advance", post(routes::practice::advance))
        // Learner progress
        .route("/api/progress", get(routes::progress::summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let content_path =
        std::env::var("CONTENT_PATH").unwrap_or_else(|_| "content/course.json".to_string());
    tracing::info!("Loading course content from {}...", content_path);
    let course = content::load_course(Path::new(&content_path))?;

    let state_dir = std::env::var("STATE_DIR").unwrap_or_else(|_| "state".to_string());
    tracing::info!("Opening learner state in {}...", state_dir);
    let store = JsonStore::new(&state_dir);
    store.init()?;

    let tutor = TutorClient::from_env();

    let state = AppState::new(course, store, tutor);
    let app = router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
