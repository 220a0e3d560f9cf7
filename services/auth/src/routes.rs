//! Authentication service routes

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::extract::cookie::CookieJar;
use common::{AccountUpdate, NewUser, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    cookies::{REFRESH_TOKEN_COOKIE, clear_session_cookies, set_session_cookies},
    error::{ApiError, ApiResult, AuthError},
    middleware::{CurrentUser, auth_middleware},
    password::{hash_password, verify_password},
    rate_limiter::login_key,
    response::ApiResponse,
    session::TokenPair,
    state::AppState,
    validation::{require_fields, validate_email, validate_password, validate_username},
};

/// Request for user registration
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub password: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Request for token refresh; the cookie wins when both are present
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Request for a password change
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/logout", post(logout))
        .route("/users/current-user", get(current_user))
        .route("/users/change-password", post(change_password))
        .route("/users/update-account", patch(update_account))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refresh-token", post(refresh_token))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<ApiResponse<UserProfile>> {
    require_fields(&[
        ("username", payload.username.as_str()),
        ("email", payload.email.as_str()),
        ("fullName", payload.full_name.as_str()),
        ("password", payload.password.as_str()),
    ])?;
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let new_user = NewUser {
        username: payload.username.trim().to_lowercase(),
        email: payload.email.trim().to_string(),
        full_name: payload.full_name.trim().to_string(),
        avatar: payload.avatar,
        cover_image: payload.cover_image,
        password_hash: hash_password(&payload.password)?,
    };

    let user = state.users().create(new_user).await.map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
        other => other,
    })?;

    info!("Registered user: {}", user.id);
    Ok(ApiResponse::created(user.profile(), "User registered successfully"))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let identifiers: Vec<&str> = [payload.username.as_deref(), payload.email.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    let Some(&identifier) = identifiers.first() else {
        return Err(ApiError::BadRequest("username or email is required".to_string()));
    };

    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }

    let throttle_key = login_key(peer.map(|ConnectInfo(addr)| addr.ip()), identifier);
    if !state.rate_limiter.is_allowed(&throttle_key).await {
        warn!("Login throttled for: {}", identifier);
        return Err(ApiError::TooManyRequests);
    }

    info!("Login attempt for user: {}", identifier);

    let mut user = None;
    for candidate in &identifiers {
        user = state.users().find_by_username_or_email(candidate).await?;
        if user.is_some() {
            break;
        }
    }

    let Some(user) = user else {
        state.rate_limiter.record_failure(&throttle_key).await;
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        state.rate_limiter.record_failure(&throttle_key).await;
        warn!("Invalid password for user: {}", user.id);
        return Err(AuthError::InvalidCredential.into());
    }

    state.rate_limiter.reset(&throttle_key).await;

    let tokens = state.sessions.issue(user.id).await?;
    let jar = set_session_cookies(jar, &tokens);

    let response = LoginResponse {
        user: user.profile(),
        tokens,
    };

    Ok((jar, ApiResponse::ok(response, "User logged in successfully")))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<(CookieJar, ApiResponse<TokenPair>)> {
    let from_cookie = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty());

    let presented = from_cookie.or_else(|| payload.and_then(|Json(body)| body.refresh_token));

    let tokens = state.sessions.rotate(presented.as_deref()).await?;
    let jar = set_session_cookies(jar, &tokens);

    Ok((jar, ApiResponse::ok(tokens, "Access token refreshed successfully")))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    caller: CurrentUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    state.sessions.revoke(caller.id()).await?;

    Ok((
        clear_session_cookies(jar),
        ApiResponse::ok(json!({}), "User logged out"),
    ))
}

/// Profile of the authenticated caller
pub async fn current_user(caller: CurrentUser) -> ApiResponse<UserProfile> {
    ApiResponse::ok(caller.0, "Current user fetched successfully")
}

/// Change the caller's password and end their session
pub async fn change_password(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    require_fields(&[
        ("oldPassword", payload.old_password.as_str()),
        ("newPassword", payload.new_password.as_str()),
    ])?;

    let user = state
        .users()
        .find_by_id(caller.id())
        .await?
        .ok_or(AuthError::InvalidCredential)?;

    if !verify_password(&payload.old_password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Invalid old password".to_string()));
    }

    validate_password(&payload.new_password)?;
    let password_hash = hash_password(&payload.new_password)?;
    state.users().update_password(user.id, &password_hash).await?;

    info!("Password changed for user: {}", user.id);
    Ok(ApiResponse::ok(json!({}), "Password updated successfully"))
}

/// Update the caller's full name and email
pub async fn update_account(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(payload): Json<AccountUpdate>,
) -> ApiResult<ApiResponse<UserProfile>> {
    require_fields(&[("fullName", payload.full_name.as_str()), ("email", payload.email.as_str())])?;
    validate_email(&payload.email)?;

    let user = state
        .users()
        .update_account(caller.id(), payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(
        user.profile(),
        "Account details updated successfully",
    ))
}
