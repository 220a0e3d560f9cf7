//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use common::UserStore;

use crate::{jwt::JwtService, rate_limiter::RateLimiter, session::SessionManager};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, jwt_service: JwtService, rate_limiter: RateLimiter) -> Self {
        Self {
            sessions: SessionManager::new(users, jwt_service),
            rate_limiter,
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
