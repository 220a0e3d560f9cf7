//! API service routes

use auth::{ApiError, ApiResult, CurrentUser, auth_middleware};
use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{models::Video, state::AppState};

mod channels;
mod comments;
mod dashboard;
mod likes;
mod subscriptions;
mod tweets;
mod videos;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/videos", get(videos::list_videos).post(videos::publish_video))
        .route(
            "/videos/:id",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/videos/:id/toggle-publish", patch(videos::toggle_publish))
        .route(
            "/comments/:video_id",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/comments/c/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/tweets", post(tweets::create_tweet))
        .route("/tweets/user/:user_id", get(tweets::user_tweets))
        .route(
            "/tweets/:id",
            patch(tweets::update_tweet).delete(tweets::delete_tweet),
        )
        .route("/likes/toggle/v/:id", post(likes::toggle_video_like))
        .route("/likes/toggle/c/:id", post(likes::toggle_comment_like))
        .route("/likes/toggle/t/:id", post(likes::toggle_tweet_like))
        .route("/likes/videos", get(likes::liked_videos))
        .route(
            "/subscriptions/c/:channel_id",
            get(subscriptions::channel_subscribers).post(subscriptions::toggle_subscription),
        )
        .route(
            "/subscriptions/u/:subscriber_id",
            get(subscriptions::subscribed_channels),
        )
        .route("/channels/:username", get(channels::channel_profile))
        .route("/dashboard/stats", get(dashboard::channel_stats))
        .route("/dashboard/videos", get(dashboard::channel_videos))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Turn a missing row into a 404 naming the resource
fn found<T>(resource: Option<T>, what: &str) -> ApiResult<T> {
    resource.ok_or_else(|| ApiError::NotFound(format!("{} not found", what)))
}

/// Load a video the caller may see; unpublished videos exist only for their owner
async fn visible_video(state: &AppState, caller: &CurrentUser, id: Uuid) -> ApiResult<Video> {
    match state.content.find_video(id).await? {
        Some(video) if video.is_published || video.owner_id == caller.id() => Ok(video),
        _ => Err(ApiError::NotFound("Video not found".to_string())),
    }
}

/// Trimmed content, rejecting blank input
fn required_content(content: &str) -> ApiResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("content is required".to_string()));
    }
    Ok(content)
}
