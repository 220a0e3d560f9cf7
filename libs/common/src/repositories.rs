//! Credential store for user records
//!
//! The session lifecycle only ever touches users through [`UserStore`], so the
//! services can run against PostgreSQL in production and against
//! [`MemoryUserStore`] in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::DatabaseResult,
    models::{AccountUpdate, NewUser, User},
};

pub mod memory;
pub mod user;

pub use memory::MemoryUserStore;
pub use user::PgUserStore;

/// Persistence operations on user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with a conflict when the username or email is taken
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Find a user whose username or email equals `username_or_email`
    async fn find_by_username_or_email(&self, username_or_email: &str)
    -> DatabaseResult<Option<User>>;

    /// Overwrite the stored refresh token without touching any other field.
    ///
    /// Returns false when no such user exists.
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> DatabaseResult<bool>;

    /// Swap the stored refresh token from `expected` to `new` in one step.
    ///
    /// Returns false when the stored value is not `expected`, leaving it untouched.
    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        new: &str,
    ) -> DatabaseResult<bool>;

    /// Replace the password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool>;

    /// Update the user-editable account details
    async fn update_account(&self, id: Uuid, update: AccountUpdate)
    -> DatabaseResult<Option<User>>;
}
