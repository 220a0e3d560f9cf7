//! Session lifecycle: issuing, rotating and revoking token pairs
//!
//! A user has at most one live refresh token, mirrored on the user record.
//! Rotation only succeeds when the presented token equals the stored one, and
//! the overwrite is a compare-and-swap so two callers holding the same token
//! cannot both rotate it.

use std::sync::Arc;

use common::UserStore;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{error::AuthError, jwt::JwtService};

/// A freshly minted access/refresh token pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session manager for handling user sessions on the credential store
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    jwt_service: JwtService,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(users: Arc<dyn UserStore>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Mint a token pair for a user and make its refresh token the current one.
    ///
    /// Any previously stored refresh token stops being accepted.
    pub async fn issue(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let pair = self.mint(user_id)?;

        if !self
            .users
            .set_refresh_token(user_id, Some(pair.refresh_token.as_str()))
            .await?
        {
            warn!("Cannot issue tokens for missing user: {}", user_id);
            return Err(AuthError::InvalidCredential);
        }

        info!("Issued session for user: {}", user_id);
        Ok(pair)
    }

    /// Exchange the current refresh token for a new pair.
    pub async fn rotate(&self, presented: Option<&str>) -> Result<TokenPair, AuthError> {
        let presented = presented
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::AuthenticationRequired)?;

        let claims = self.jwt_service.verify_refresh_token(presented)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidCredential)?;

        if user.refresh_token.as_deref() != Some(presented) {
            warn!("Stale refresh token presented for user: {}", user.id);
            return Err(AuthError::SessionRevoked);
        }

        let pair = self.mint(user.id)?;

        if !self
            .users
            .replace_refresh_token(user.id, presented, &pair.refresh_token)
            .await?
        {
            warn!("Refresh token for user {} was rotated concurrently", user.id);
            return Err(AuthError::SessionRevoked);
        }

        info!("Rotated session for user: {}", user.id);
        Ok(pair)
    }

    /// Forget the stored refresh token so it can never be exchanged again
    pub async fn revoke(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.users.set_refresh_token(user_id, None).await?;
        info!("Revoked session for user: {}", user_id);
        Ok(())
    }

    fn mint(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.jwt_service.generate_access_token(user_id)?,
            refresh_token: self.jwt_service.generate_refresh_token(user_id)?,
        })
    }
}
