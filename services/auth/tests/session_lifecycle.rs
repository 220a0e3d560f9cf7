//! End-to-end tests of the account routes against the in-memory credential store

use std::{net::SocketAddr, sync::Arc};

use auth::{
    jwt::{JwtConfig, JwtService},
    password::hash_password,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    routes::create_router,
    state::AppState,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode, header},
};
use common::{MemoryUserStore, NewUser, UserStore};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

fn app_with_limiter(store: &MemoryUserStore, limiter: RateLimiterConfig) -> Router {
    let state = AppState::new(
        Arc::new(store.clone()),
        JwtService::new(jwt_config()),
        RateLimiter::new(limiter),
    );
    create_router(state)
}

fn app(store: &MemoryUserStore) -> Router {
    app_with_limiter(store, RateLimiterConfig::default())
}

async fn seed_user(store: &MemoryUserStore, username: &str, password: &str) -> Uuid {
    store
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: username.to_string(),
            avatar: None,
            cover_image: None,
            password_hash: hash_password(password).unwrap(),
        })
        .await
        .unwrap()
        .id
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl Reply {
    fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn token(&self, name: &str) -> String {
        self.body["data"][name].as_str().unwrap().to_string()
    }
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        headers,
        body,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> Reply {
    send(
        app,
        post_json(
            "/users/login",
            json!({ "username": username, "password": password }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_login_returns_tokens_and_sets_two_cookies() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let reply = login(&app, "alice", "p@ss").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(!reply.token("accessToken").is_empty());
    assert!(!reply.token("refreshToken").is_empty());
    assert_eq!(reply.body["data"]["user"]["username"], "alice");
    assert!(reply.body["data"]["user"].get("passwordHash").is_none());

    let cookies = reply.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly") && c.contains("Secure")));
}

#[tokio::test]
async fn test_login_failures() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let missing = send(&app, post_json("/users/login", json!({ "password": "p@ss" }))).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown = login(&app, "nobody", "p@ss").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let wrong = login(&app, "alice", "wrong").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "invalid_credential");
    assert!(wrong.set_cookies().is_empty());
}

#[tokio::test]
async fn test_login_by_email() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let reply = send(
        &app,
        post_json(
            "/users/login",
            json!({ "email": "alice@example.com", "password": "p@ss" }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_is_throttled_after_repeated_failures() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app_with_limiter(
        &store,
        RateLimiterConfig {
            max_attempts: 2,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        },
    );

    assert_eq!(login(&app, "alice", "bad").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(login(&app, "alice", "bad").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        login(&app, "alice", "p@ss").await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
}

fn login_from(peer: &str, username: &str, password: &str) -> Request<Body> {
    let mut request = post_json(
        "/users/login",
        json!({ "username": username, "password": password }),
    );
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[tokio::test]
async fn test_throttle_is_scoped_to_the_failing_peer() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app_with_limiter(
        &store,
        RateLimiterConfig {
            max_attempts: 2,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        },
    );

    let attacker = "203.0.113.7:40000";
    for _ in 0..2 {
        let reply = send(&app, login_from(attacker, "alice", "guess")).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }
    let blocked = send(&app, login_from(attacker, "alice", "p@ss")).await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);

    let owner = send(&app, login_from("198.51.100.2:50000", "alice", "p@ss")).await;
    assert_eq!(owner.status, StatusCode::OK);
}

#[tokio::test]
async fn test_blank_username_falls_back_to_email() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let reply = send(
        &app,
        post_json(
            "/users/login",
            json!({ "username": "", "email": "alice@example.com", "password": "p@ss" }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(
        &app,
        post_json(
            "/users/login",
            json!({ "username": "nobody", "email": "alice@example.com", "password": "p@ss" }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["user"]["username"], "alice");
}

#[tokio::test]
async fn test_refresh_rotates_exactly_once() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let first = login(&app, "alice", "p@ss").await.token("refreshToken");

    let rotated = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": first })),
    )
    .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_ne!(rotated.token("refreshToken"), first);
    assert_eq!(rotated.set_cookies().len(), 2);

    let replay = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": first })),
    )
    .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["error"], "session_revoked");
    assert!(replay.set_cookies().is_empty());
}

#[tokio::test]
async fn test_refresh_with_unstored_token_is_revoked() {
    let store = MemoryUserStore::new();
    let user_id = seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    login(&app, "alice", "p@ss").await;
    let forged = JwtService::new(jwt_config())
        .generate_refresh_token(user_id)
        .unwrap();

    let reply = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": forged })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "session_revoked");
    assert!(reply.set_cookies().is_empty());
}

#[tokio::test]
async fn test_refresh_prefers_cookie_over_body() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let token = login(&app, "alice", "p@ss").await.token("refreshToken");

    let request = Request::post("/users/refresh-token")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("refreshToken={}", token))
        .body(Body::from(json!({ "refreshToken": "garbage" }).to_string()))
        .unwrap();

    assert_eq!(send(&app, request).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_token_requires_authentication() {
    let store = MemoryUserStore::new();
    let app = app(&store);

    let request = Request::post("/users/refresh-token").body(Body::empty()).unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "authentication_required");

    let garbage = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": "garbage" })),
    )
    .await;
    assert_eq!(garbage.body["error"], "invalid_credential");
}

#[tokio::test]
async fn test_logout_revokes_refresh_token_and_clears_cookies() {
    let store = MemoryUserStore::new();
    let user_id = seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let session = login(&app, "alice", "p@ss").await;
    let access = session.token("accessToken");
    let refresh = session.token("refreshToken");

    let request = Request::post("/users/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .body(Body::empty())
        .unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::OK);
    let cookies = reply.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));

    let stored = store.find_by_id(user_id).await.unwrap().unwrap();
    assert!(stored.refresh_token.is_none());

    let replay = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["error"], "session_revoked");
}

#[tokio::test]
async fn test_current_user_requires_a_session() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let anonymous = send(
        &app,
        Request::get("/users/current-user").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "authentication_required");

    let access = login(&app, "alice", "p@ss").await.token("accessToken");
    let request = Request::get("/users/current-user")
        .header(header::COOKIE, format!("accessToken={}", access))
        .body(Body::empty())
        .unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["username"], "alice");
    assert!(reply.body["data"].get("refreshToken").is_none());
}

#[tokio::test]
async fn test_register_then_login_with_short_password() {
    let store = MemoryUserStore::new();
    let app = app(&store);

    let registered = send(
        &app,
        post_json(
            "/users/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "fullName": "Alice",
                "password": "p@ss"
            }),
        ),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let reply = login(&app, "alice", "p@ss").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(!reply.token("accessToken").is_empty());
    assert_eq!(reply.set_cookies().len(), 2);
}

#[tokio::test]
async fn test_register_then_duplicate_conflicts() {
    let store = MemoryUserStore::new();
    let app = app(&store);

    let body = json!({
        "username": "Bob_99",
        "email": "bob@example.com",
        "fullName": "Bob",
        "password": "hunter2hunter",
    });

    let created = send(&app, post_json("/users/register", body.clone())).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["username"], "bob_99");
    assert_eq!(created.body["success"], true);

    let duplicate = send(&app, post_json("/users/register", body)).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let blank = send(
        &app,
        post_json("/users/register", json!({ "username": "carol" })),
    )
    .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_ends_the_session() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let session = login(&app, "alice", "p@ss").await;
    let access = session.token("accessToken");
    let refresh = session.token("refreshToken");

    let wrong_old = Request::post("/users/change-password")
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "oldPassword": "nope", "newPassword": "newpass123" }).to_string(),
        ))
        .unwrap();
    assert_eq!(send(&app, wrong_old).await.status, StatusCode::BAD_REQUEST);

    let request = Request::post("/users/change-password")
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "oldPassword": "p@ss", "newPassword": "newpass123" }).to_string(),
        ))
        .unwrap();
    assert_eq!(send(&app, request).await.status, StatusCode::OK);

    let replay = send(
        &app,
        post_json("/users/refresh-token", json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(replay.body["error"], "session_revoked");

    assert_eq!(login(&app, "alice", "newpass123").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_account() {
    let store = MemoryUserStore::new();
    seed_user(&store, "alice", "p@ss").await;
    let app = app(&store);

    let access = login(&app, "alice", "p@ss").await.token("accessToken");
    let request = Request::patch("/users/update-account")
        .header(header::AUTHORIZATION, format!("Bearer {}", access))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "fullName": "Alice Liddell", "email": "liddell@example.com" }).to_string(),
        ))
        .unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["fullName"], "Alice Liddell");
    assert_eq!(reply.body["data"]["email"], "liddell@example.com");
}
