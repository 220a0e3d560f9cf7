//! Middleware for access token validation and authentication

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};
use common::UserProfile;
use tracing::warn;
use uuid::Uuid;

use crate::{cookies::ACCESS_TOKEN_COOKIE, error::AuthError, session::SessionManager};

/// The caller resolved by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

/// Pull the access token from the `accessToken` cookie, falling back to a bearer header
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve the caller of a request without touching any stored state
pub async fn authenticate(
    sessions: &SessionManager,
    headers: &HeaderMap,
) -> Result<UserProfile, AuthError> {
    let token = extract_access_token(headers).ok_or(AuthError::AuthenticationRequired)?;
    let claims = sessions.jwt().verify_access_token(&token)?;

    let user = sessions
        .users()
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Access token for unknown user: {}", claims.sub);
            AuthError::InvalidCredential
        })?;

    Ok(user.into())
}

/// Authenticate the request and attach the caller as a [`CurrentUser`] extension
pub async fn auth_middleware(
    State(sessions): State<SessionManager>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&sessions, req.headers()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}
