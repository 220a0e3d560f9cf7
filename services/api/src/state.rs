//! Application state for the API service

use std::sync::Arc;

use auth::{SessionManager, jwt::JwtService};
use axum::extract::FromRef;
use common::UserStore;

use crate::repositories::ContentStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub content: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        content: Arc<dyn ContentStore>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            sessions: SessionManager::new(users, jwt_service),
            content,
        }
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        self.sessions.users()
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
