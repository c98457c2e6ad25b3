//! Common test utilities for integration tests.
//!
//! Tests run hermetically: course content comes from fixtures, learner
//! state lives in a throwaway temp directory, and the tutor client has no
//! API key, so conversation turns resolve to a classified configuration
//! error without any network traffic.

pub mod fixtures;

use axum::Router;
use tempfile::TempDir;

use lingua_backend::services::tutor::TutorClient;
use lingua_backend::store::JsonStore;
use lingua_backend::{router, AppState};

/// Test context holding a throwaway state directory and the app state.
pub struct TestContext {
    pub state_dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let state_dir = TempDir::new().expect("temp state dir");
        let store = JsonStore::new(state_dir.path());
        store.init().expect("state dir init");

        let tutor = TutorClient::new(None, "test-model");
        let state = AppState::new(fixtures::course(), store, tutor);

        Self { state_dir, state }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }
}
