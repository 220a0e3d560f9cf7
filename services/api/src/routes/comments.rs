//! Comment handlers

use auth::{ApiResponse, ApiResult, CurrentUser, ensure_owner};
use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::{found, required_content, visible_video};
use crate::{
    extract::ResourceId,
    models::{Comment, ContentRequest, NewComment},
    state::AppState,
};

pub async fn list_comments(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(video_id): ResourceId,
) -> ApiResult<ApiResponse<Vec<Comment>>> {
    visible_video(&state, &caller, video_id).await?;

    let comments = state.content.list_comments(video_id).await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

pub async fn add_comment(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(video_id): ResourceId,
    Json(payload): Json<ContentRequest>,
) -> ApiResult<ApiResponse<Comment>> {
    let content = required_content(&payload.content)?;
    visible_video(&state, &caller, video_id).await?;

    let comment = state
        .content
        .create_comment(NewComment {
            video_id,
            owner_id: caller.id(),
            content: content.to_string(),
        })
        .await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

pub async fn update_comment(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(comment_id): ResourceId,
    Json(payload): Json<ContentRequest>,
) -> ApiResult<ApiResponse<Comment>> {
    let comment = found(state.content.find_comment(comment_id).await?, "Comment")?;
    ensure_owner(&caller, &comment)?;

    let content = required_content(&payload.content)?;
    let comment = found(
        state.content.update_comment(comment_id, content).await?,
        "Comment",
    )?;

    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(comment_id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    let comment = found(state.content.find_comment(comment_id).await?, "Comment")?;
    ensure_owner(&caller, &comment)?;

    state.content.delete_comment(comment_id).await?;
    Ok(ApiResponse::ok(json!({}), "Comment deleted successfully"))
}
