//! Like toggles and liked videos

use auth::{ApiResponse, ApiResult, CurrentUser};
use axum::extract::State;
use serde_json::{Value, json};
use tracing::debug;

use super::{found, visible_video};
use crate::{
    extract::ResourceId,
    models::{LikeTarget, Video},
    state::AppState,
};

/// Remove the caller's like when present, otherwise add one.
/// Check-then-branch; two concurrent toggles may both insert.
async fn toggle_like(
    state: &AppState,
    caller: &CurrentUser,
    target: LikeTarget,
) -> ApiResult<ApiResponse<Value>> {
    match state.content.find_like(caller.id(), target).await? {
        Some(like) => {
            state.content.delete_like(like.id).await?;
            debug!("User {} unliked {:?}", caller.id(), target);
            Ok(ApiResponse::ok(json!({ "isLiked": false }), "Like removed successfully"))
        }
        None => {
            let like = state.content.create_like(caller.id(), target).await?;
            debug!("User {} liked {:?}", caller.id(), target);
            Ok(ApiResponse::created(
                json!({ "isLiked": true, "like": like }),
                "Like added successfully",
            ))
        }
    }
}

pub async fn toggle_video_like(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    visible_video(&state, &caller, id).await?;
    toggle_like(&state, &caller, LikeTarget::Video(id)).await
}

pub async fn toggle_comment_like(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    found(state.content.find_comment(id).await?, "Comment")?;
    toggle_like(&state, &caller, LikeTarget::Comment(id)).await
}

pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    caller: CurrentUser,
    ResourceId(id): ResourceId,
) -> ApiResult<ApiResponse<Value>> {
    found(state.content.find_tweet(id).await?, "Tweet")?;
    toggle_like(&state, &caller, LikeTarget::Tweet(id)).await
}

pub async fn liked_videos(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<ApiResponse<Vec<Video>>> {
    let videos = state.content.liked_videos(caller.id()).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
