//! PostgreSQL-backed user repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::{
    error::{DatabaseError, DatabaseResult},
    models::{AccountUpdate, NewUser, User},
};

const USER_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, \
                            password_hash, refresh_token, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.username);

        let query = format!(
            r#"
            INSERT INTO users (id, username, email, full_name, avatar, cover_image, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(new_user.username.to_lowercase())
            .bind(&new_user.email)
            .bind(&new_user.full_name)
            .bind(&new_user.avatar)
            .bind(&new_user.cover_image)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> DatabaseResult<Option<User>> {
        info!("Finding user by username or email: {}", username_or_email);

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = LOWER($1) OR email = $1 LIMIT 1"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(username_or_email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        new: &str,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $3 WHERE id = $1 AND refresh_token = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, refresh_token = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_account(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> DatabaseResult<Option<User>> {
        let query = format!(
            r#"
            UPDATE users SET full_name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&update.full_name)
            .bind(&update.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }
}
