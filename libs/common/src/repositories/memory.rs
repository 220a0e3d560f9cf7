//! In-process user store used by tests and local tooling

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::UserStore;
use crate::{
    error::{DatabaseError, DatabaseResult},
    models::{AccountUpdate, NewUser, User},
};

/// User store backed by a mutex-guarded map
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Remove a user outright
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.lock().await.remove(&id)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.lock().await;
        let username = new_user.username.to_lowercase();

        if users.values().any(|u| u.username == username) {
            return Err(DatabaseError::Conflict("users_username_key".to_string()));
        }
        if users.values().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username,
            email: new_user.email,
            full_name: new_user.full_name,
            avatar: new_user.avatar,
            cover_image: new_user.cover_image,
            password_hash: new_user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> DatabaseResult<Option<User>> {
        let lowered = username_or_email.to_lowercase();
        let users = self.users.lock().await;

        Ok(users
            .values()
            .find(|u| u.username == lowered || u.email == username_or_email)
            .cloned())
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> DatabaseResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.refresh_token = token.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        new: &str,
    ) -> DatabaseResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) if user.refresh_token.as_deref() == Some(expected) => {
                user.refresh_token = Some(new.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.refresh_token = None;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_account(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> DatabaseResult<Option<User>> {
        let mut users = self.users.lock().await;

        if users
            .values()
            .any(|u| u.id != id && u.email == update.email)
        {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }

        Ok(users.get_mut(&id).map(|user| {
            user.full_name = update.full_name;
            user.email = update.email;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}
