//! Tweet handlers

use auth::{ApiResponse, ApiResult, CurrentUser, ensure_owner};
use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::{found, required_content};
use crate::{
    extract::ResourceId,
    models::{ContentRequest, Tweet},
    state::AppState,
};

pub async fn create_tweet(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(payload): Json<ContentRequest>,
) -> ApiResult<ApiResponse<Tweet>> {
    let content = required_content(&payload.content)?;
    let tweet = state.content.create_tweet(caller.id(), content).await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// Tweets of any user, newest first
pub async fn user_tweets(
    State(state): State<AppState>,
    ResourceId(user_id): ResourceId,
) -> ApiResult<ApiResponse<Vec<Tweet>>> {
    found(state.users().find_by_id(user_id).await?, "User")?;

    let tweets = state.content.list_tweets(user_id).await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

pub async fn update_tweet(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
    Json(payload): Json<ContentRequest>,
) -> ApiResult<ApiResponse<Tweet>> {
    let tweet = found(state.content.find_tweet(id).await?, "Tweet")?;
    ensure_owner(&caller, &tweet)?;

    let content = required_content(&payload.content)?;
    let tweet = found(state.content.update_tweet(id, content).await?, "Tweet")?;

    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    let tweet = found(state.content.find_tweet(id).await?, "Tweet")?;
    ensure_owner(&caller, &tweet)?;

    state.content.delete_tweet(id).await?;
    Ok(ApiResponse::ok(json!({}), "Tweet deleted successfully"))
}
